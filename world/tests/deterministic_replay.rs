use std::time::Duration;

use path_puzzle_core::{CellCoord, Command, Event, Facing, LevelSpec, Move, SessionConfig};
use path_puzzle_world::{announce_level, apply, query, World};

fn levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec::new(
            Facing::North,
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(4, 1),
                CellCoord::new(4, 2),
            ],
        ),
        LevelSpec::new(
            Facing::West,
            vec![CellCoord::new(5, 5), CellCoord::new(5, 4)],
        ),
    ]
}

fn script() -> Vec<Command> {
    let mut commands = vec![
        Command::EnqueueMove {
            action: Move::Forward,
        },
        Command::EnqueueMove {
            action: Move::TurnLeft,
        },
        Command::UndoMove,
        Command::EnqueueMove {
            action: Move::Forward,
        },
        Command::EnqueueMove {
            action: Move::TurnRight,
        },
        Command::EnqueueMove {
            action: Move::Forward,
        },
        Command::Run,
    ];
    for _ in 0..300 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(16),
        });
    }
    commands
}

fn replay(commands: &[Command]) -> (Vec<Event>, World) {
    let mut world = World::new(SessionConfig::default(), levels()).expect("valid session");
    let mut events = Vec::new();
    announce_level(&world, &mut events);
    for command in commands {
        let before = events.len();
        apply(&mut world, command.clone(), &mut events);
        let moved = events[before..].iter().find_map(|event| match event {
            Event::MotionStarted { to, .. } => Some(*to),
            _ => None,
        });
        if let Some(to) = moved {
            apply(
                &mut world,
                Command::SamplePosition {
                    x: to.x(),
                    z: to.z(),
                },
                &mut events,
            );
        }
    }
    (events, world)
}

#[test]
fn identical_scripts_produce_identical_event_logs() {
    let commands = script();
    let (first_log, first_world) = replay(&commands);
    let (second_log, second_world) = replay(&commands);

    assert_eq!(first_log, second_log);
    assert_eq!(query::progress(&first_world), query::progress(&second_world));
}

#[test]
fn scripted_solution_completes_first_level() {
    let (events, world) = replay(&script());

    assert_eq!(query::state(&world), path_puzzle_core::GameState::Complete);
    assert!(events.contains(&Event::ObstacleHidden));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CommandRejected { .. })));
}
