use std::error::Error;

use action_graph::{Action, Planner, State};

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG=trace shows every step of the search
    env_logger::init();

    // Service actions: "driving" and "has_car" can take whatever value the goal asks for
    let drive = Action::new("drive", 1.0)?
        .with_service_effect("driving")
        .with_precondition("has_drivers_license", true)
        .with_precondition("has_car", "$driving")
        .with_precondition("tank_has_gas", true);

    let fill_gas = Action::new("fill_gas", 1.0)?
        .with_effect("tank_has_gas", true)
        .with_precondition("has_car", "$has_car");

    let rent_car = Action::new("rent_car", 1.0)?
        .with_service_effect("has_car")
        .with_precondition("rental_available", "$has_car");

    let buy_car = Action::new("buy_car", 1.0)?.with_service_effect("has_car");

    let planner = Planner::new(vec![drive, fill_gas, rent_car, buy_car]);

    let world_state = State::single("has_drivers_license", true);
    let goal_state = State::single("driving", "Delorean");

    println!("Initial State: {}", world_state);
    println!("Goal State:    {}", goal_state);

    if planner.is_goal_met(&goal_state, &world_state) {
        println!("Nothing to do");
        return Ok(());
    }

    let plan = planner.find_plan(&world_state, &goal_state)?;
    print!("{}", plan);
    println!("Total cost: {}", plan.total_cost());

    Ok(())
}
