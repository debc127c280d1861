// record.rs - Meal commands: analyze, record, quick-record, balance, progress.

use std::path::Path;

use anyhow::Context as _;
use base64::{engine::general_purpose::STANDARD, Engine};
use sf_api::{
    ApiErrorResponse, CreateRecordRequest, MealRecordResponse, PortionOption, ProgressRange,
    ServiceError,
};

use super::{user_facing, Context};

pub async fn analyze(ctx: &Context, image: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("failed to read image {}", image.display()))?;
    let encoded = STANDARD.encode(&bytes);

    match ctx.client.analyze_image(&encoded).await {
        Ok(analysis) => {
            let source = if analysis.ai_used { "model" } else { "catalogue" };
            println!("Recognised: {} (via {})", analysis.food_name, source);
            print_portions(&analysis.portion_options);
            Ok(())
        }
        Err(ServiceError::Rejected { status, detail }) => {
            print_rejection(&detail);
            anyhow::bail!("recognition rejected by service ({})", status)
        }
        Err(e) => Err(user_facing(e)),
    }
}

pub async fn record(
    ctx: &Context,
    image_url: &str,
    food: &str,
    portion: u64,
) -> anyhow::Result<()> {
    let request = CreateRecordRequest {
        image_url: image_url.to_string(),
        food_name: food.to_string(),
        visual_portion_id: portion,
    };
    let meal = ctx.client.create_record(&request).await.map_err(user_facing)?;
    print_meal(&meal);
    Ok(())
}

pub async fn quick_record(ctx: &Context, portion: u64) -> anyhow::Result<()> {
    let meal = ctx.client.quick_record(portion).await.map_err(user_facing)?;
    print_meal(&meal);
    Ok(())
}

pub async fn balance(ctx: &Context) -> anyhow::Result<()> {
    let balance = ctx.client.balance().await.map_err(user_facing)?;

    println!("Today ({} meals)", balance.meals_count);
    println!(
        "  Calories: {:.0} / {:.0} kcal, {:.0} remaining",
        balance.consumed_calories, balance.target_calories, balance.remaining_calories
    );
    println!(
        "  Protein:  {:.1} / {:.1} g, {:.1} remaining",
        balance.consumed_protein, balance.target_protein, balance.remaining_protein
    );
    if !balance.suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for s in &balance.suggestions {
            println!(
                "  [{}] {} {} - {:.0} kcal, {:.1} g protein ({})",
                s.id, s.food_name, s.portion_name, s.calories, s.protein, s.reason
            );
        }
    }
    Ok(())
}

pub async fn progress(ctx: &Context, range: ProgressRange) -> anyhow::Result<()> {
    let progress = ctx.client.progress(range).await.map_err(user_facing)?;

    println!("Progress ({}, {} days tracked)", range, progress.days_tracked);
    println!(
        "  Total deficit: {:.0} kcal (about {:.2} kg of fat)",
        progress.total_calorie_deficit, progress.estimated_fat_lost
    );
    if !progress.data_points.is_empty() {
        println!();
        println!("{:<12} {:>10} {:>10}", "DATE", "CONSUMED", "DEFICIT");
        for point in &progress.data_points {
            println!(
                "{:<12} {:>10.0} {:>10.0}",
                point.date, point.consumed_calories, point.calorie_deficit
            );
        }
    }
    if !progress.encouragement.is_empty() {
        println!();
        println!("{}", progress.encouragement);
    }
    Ok(())
}

pub(crate) fn print_portions(portions: &[PortionOption]) {
    if portions.is_empty() {
        println!("No portions available.");
        return;
    }
    println!("{:<6} {:<20} {:>8} {:>8} {:>8}", "ID", "PORTION", "GRAMS", "KCAL", "PROTEIN");
    for p in portions {
        println!(
            "{:<6} {:<20} {:>8.0} {:>8.0} {:>8.1}",
            p.id, p.portion_name, p.weight_grams, p.calories, p.protein
        );
    }
}

pub(crate) fn print_rejection(detail: &ApiErrorResponse) {
    println!("{}", detail.message);
    if let Some(code) = &detail.code {
        println!("  Code: {}", code);
    }
    if let Some(food) = &detail.recognized_food {
        println!("  Recognised as: {}", food);
    }
    if let Some(foods) = detail.available_foods.as_ref().filter(|f| !f.is_empty()) {
        println!("  Known foods: {}", foods.join(", "));
    }
}

fn print_meal(meal: &MealRecordResponse) {
    println!("Recorded meal #{}", meal.id);
    println!("  Food:     {}", meal.food_name);
    println!("  Calories: {:.0} kcal", meal.calories);
    println!("  Protein:  {:.1} g", meal.protein);
    println!("  At:       {}", meal.record_date.format("%Y-%m-%d %H:%M"));
}
