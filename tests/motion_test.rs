use warehouse_bot::motion::{
    Axis, CalibrationTable, CommandSelector, Direction, DynamicCommand, SelectorConfig, cm_to_pixel,
    pixel_to_cm,
};

#[test]
fn test_pixel_near_gripper_needs_no_move() {
    let selector = CommandSelector::default();

    // Row 100 counted from the bottom edge of the frame.
    let (x_cm, y_cm) = pixel_to_cm(233.0, 412.0);
    assert_eq!((x_cm, y_cm), (0.0, 1.0));
    assert!(selector.select_commands(x_cm, y_cm).is_empty());
    assert_eq!(selector.dynamic_command(x_cm, y_cm), DynamicCommand::Stop);
}

#[test]
fn test_far_pixel_plans_lateral_then_forward() {
    let selector = CommandSelector::default();
    let (x_cm, y_cm) = pixel_to_cm(420.0, 150.0);
    assert!(x_cm > 1.0);
    assert!(y_cm > 1.0);

    let moves = selector.plan(x_cm, y_cm);
    let axes: Vec<Axis> = moves.iter().map(|m| m.axis).collect();
    assert_eq!(axes, vec![Axis::Lateral, Axis::Forward]);
    assert_eq!(moves[0].command.direction, Direction::Left);
    assert!(moves[1].distance_cm <= y_cm);
}

#[test]
fn test_repeated_planning_converges() {
    let selector = CommandSelector::new(CalibrationTable::standard(), SelectorConfig::default());

    for (start_x, start_y) in [(6.0, 20.0), (-9.5, 14.0), (2.5, -3.0), (-15.0, 26.0)] {
        let (mut x, mut y) = (start_x, start_y);
        let mut rounds = 0;
        loop {
            let moves = selector.plan(x, y);
            if moves.is_empty() {
                break;
            }
            for m in moves {
                match m.axis {
                    Axis::Backward => y += m.distance_cm,
                    Axis::Forward => {
                        y -= m.distance_cm;
                        assert!(y >= 0.0, "forward overshot from ({start_x}, {start_y})");
                    }
                    Axis::Lateral => x -= x.signum() * m.distance_cm,
                }
            }
            rounds += 1;
            assert!(rounds < 10, "no convergence from ({start_x}, {start_y})");
        }
        assert!(x.abs() <= 1.0);
        assert!(y <= 1.5);
    }
}

#[test]
fn test_ground_point_maps_back_to_its_pixel() {
    let (px, py) = cm_to_pixel(0.0, 10.0);
    let (x_cm, y_cm) = pixel_to_cm(px.round(), py.round());
    assert_eq!(x_cm, 0.0);
    assert_eq!(y_cm, 10.0);
}
