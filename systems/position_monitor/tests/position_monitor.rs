use path_puzzle_core::Coordinate;
use path_puzzle_system_position_monitor::{Arrival, PositionMonitor, DEFAULT_TOLERANCE};

#[test]
fn goal_takes_precedence_over_overlapping_hazard() {
    let monitor = PositionMonitor::new(DEFAULT_TOLERANCE);
    let goal = Coordinate::rounded(0.0, 0.0);
    let hazard = Coordinate::rounded(0.0, 0.004);

    let verdict = monitor.classify(0.0, 0.002, goal, &[hazard]);

    assert_eq!(verdict, Some(Arrival::Goal(goal)));
}

#[test]
fn first_matching_hazard_wins() {
    let monitor = PositionMonitor::new(DEFAULT_TOLERANCE);
    let goal = Coordinate::rounded(0.36, 0.36);
    let first = Coordinate::rounded(0.12, 0.0);
    let second = Coordinate::rounded(0.12, 0.003);

    let verdict = monitor.classify(0.12, 0.002, goal, &[first, second]);

    assert_eq!(verdict, Some(Arrival::Hazard(first)));
    assert_eq!(verdict.map(|arrival| arrival.cell()), Some(first));
}

#[test]
fn sample_between_cells_produces_no_verdict() {
    let monitor = PositionMonitor::default();
    let goal = Coordinate::rounded(0.0, 0.12);
    let hazards = [Coordinate::rounded(0.0, -0.12), Coordinate::rounded(0.12, 0.0)];

    assert_eq!(monitor.classify(0.0, 0.06, goal, &hazards), None);
}

#[test]
fn sample_on_window_edge_counts_as_arrival() {
    let monitor = PositionMonitor::new(0.25);
    let goal = Coordinate::rounded(0.5, 0.5);

    assert_eq!(
        monitor.classify(0.75, 0.25, goal, &[]),
        Some(Arrival::Goal(goal))
    );
}
