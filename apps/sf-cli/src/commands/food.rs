// food.rs - Food catalogue subcommands.

use clap::Subcommand;
use sf_api::{FoodItemInfo, ServiceError};

use super::record::{print_portions, print_rejection};
use super::{user_facing, Context};

#[derive(Subcommand)]
pub enum FoodCommands {
    /// List food categories.
    Categories,
    /// List the foods in a category.
    Category {
        /// Category key (see `foods categories`).
        key: String,
    },
    /// Search foods by name or alias.
    Search {
        query: String,
    },
    /// List the portions known for a food.
    Portions {
        food: String,
    },
}

pub async fn execute(cmd: &FoodCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        FoodCommands::Categories => {
            let categories = ctx.client.food_categories().await.map_err(user_facing)?;
            println!("{:<14} {:<6} {:<16} DESCRIPTION", "KEY", "ICON", "NAME");
            for c in &categories {
                println!("{:<14} {:<6} {:<16} {}", c.key, c.icon, c.name, c.description);
            }
            Ok(())
        }
        FoodCommands::Category { key } => {
            let listing = ctx
                .client
                .foods_by_category(key)
                .await
                .map_err(user_facing)?;
            println!("{} {}", listing.category.icon, listing.category.name);
            print_foods(&listing.foods);
            Ok(())
        }
        FoodCommands::Search { query } => {
            let foods = ctx.client.search_foods(query).await.map_err(user_facing)?;
            if foods.is_empty() {
                println!("No foods match \"{}\".", query);
            } else {
                print_foods(&foods);
            }
            Ok(())
        }
        FoodCommands::Portions { food } => match ctx.client.portions_for_food(food).await {
            Ok(portions) => {
                print_portions(&portions);
                Ok(())
            }
            Err(ServiceError::Rejected { status, detail }) => {
                print_rejection(&detail);
                anyhow::bail!("no portions for \"{}\" ({})", food, status)
            }
            Err(e) => Err(user_facing(e)),
        },
    }
}

fn print_foods(foods: &[FoodItemInfo]) {
    println!(
        "{:<20} {:<12} {:>10} {:>10} {:>9}",
        "NAME", "CATEGORY", "KCAL/100G", "PROT/100G", "PORTIONS"
    );
    for f in foods {
        println!(
            "{:<20} {:<12} {:>10.0} {:>10.1} {:>9}",
            f.name, f.category, f.calories_per_100g, f.protein_per_100g, f.portion_count
        );
        if !f.aliases.is_empty() {
            println!("  aka {}", f.aliases.join(", "));
        }
    }
}
