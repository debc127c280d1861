// goal.rs - Goal subcommands: status, init, refresh, set.

use clap::Subcommand;
use sf_api::{GoalInput, GoalRecord};
use sf_goal::{GoalManager, GoalState};

use super::{user_facing, Context};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Show the locally cached goal without contacting the service.
    Status,
    /// Decide whether a goal is set, as the app does on startup.
    Init,
    /// Ask the service for the current goal and update the cache.
    Refresh,
    /// Set a new goal; the service computes the targets.
    Set {
        /// "m" or "f".
        #[arg(long)]
        gender: String,
        #[arg(long)]
        age: u32,
        /// Height in centimetres.
        #[arg(long)]
        height: f64,
        /// Weight in kilograms.
        #[arg(long)]
        weight: f64,
        /// Daily calorie deficit to aim for.
        #[arg(long, default_value_t = 500, allow_hyphen_values = true)]
        deficit: i32,
    },
}

pub async fn execute(cmd: &GoalCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Status => show_status(&ctx.goals),
        GoalCommands::Init => init(ctx).await,
        GoalCommands::Refresh => refresh(&ctx.goals).await,
        GoalCommands::Set {
            gender,
            age,
            height,
            weight,
            deficit,
        } => {
            let input = GoalInput {
                gender: gender.clone(),
                age: *age,
                height_cm: *height,
                weight_kg: *weight,
                deficit_target: *deficit,
            };
            set_goal(ctx, &input).await
        }
    }
}

fn show_status(goals: &GoalManager) -> anyhow::Result<()> {
    match goals.cached_goal() {
        Some(goal) => {
            println!("Goal set (cached)");
            print_goal(&goal);
        }
        None if goals.is_goal_set_in_storage() => {
            println!("Goal flag is set but the cached goal is unreadable.");
            println!("Run `smartfood goal refresh` to fetch it again.");
        }
        None => println!("No goal cached."),
    }
    Ok(())
}

async fn init(ctx: &Context) -> anyhow::Result<()> {
    let has_goal = ctx.goals.initialize().await;
    println!("Goal set: {}", if has_goal { "yes" } else { "no" });

    // The answer above may come before the service does. Give the pending
    // check a chance to land so the cache is current when we exit.
    let mut changes = ctx.goals.subscribe();
    let landed = changes.wait_for(GoalState::is_settled);
    match tokio::time::timeout(ctx.settle_timeout, landed).await {
        Ok(Ok(state)) => {
            let state: GoalState = (*state).clone();
            if state.has_goal() != has_goal {
                println!("Service since reports: {}", state.status);
            }
            print_state(&state);
        }
        Ok(Err(_)) | Err(_) => {
            tracing::warn!("goal check still pending, exiting without its answer");
        }
    }
    Ok(())
}

async fn refresh(goals: &GoalManager) -> anyhow::Result<()> {
    goals.refresh().await;
    print_state(&goals.snapshot());
    Ok(())
}

async fn set_goal(ctx: &Context, input: &GoalInput) -> anyhow::Result<()> {
    let goal = ctx.goals.set_goal(input).await.map_err(user_facing)?;
    println!("Goal saved.");
    print_goal(&goal);

    if let Some(path) = sf_goal::NavigationGate::new(ctx.goals.clone(), ctx.session.clone())
        .take_return_url()
    {
        println!();
        println!("Continue to: {}", path);
    }
    Ok(())
}

fn print_state(state: &GoalState) {
    println!("Status: {}", state.status);
    if let Some(goal) = &state.record {
        print_goal(goal);
    }
    if let Some(error) = &state.error {
        println!("Warning: {}", error);
    }
}

fn print_goal(goal: &GoalRecord) {
    println!("  Gender:   {}", goal.gender);
    println!("  Age:      {}", goal.age);
    println!("  Height:   {:.1} cm", goal.height_cm);
    println!("  Weight:   {:.1} kg", goal.weight_kg);
    println!("  Deficit:  {} kcal/day", goal.deficit_target);
    println!("  Calories: {:.0} kcal/day", goal.calorie_target);
    println!("  Protein:  {:.1} g/day", goal.protein_target);
}
