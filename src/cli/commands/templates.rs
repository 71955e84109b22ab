use anyhow::Result;
use chrono::NaiveDate;
use model::Frequency;
use model::entities::transaction;
use recurrence::Clock;
use recurrence::templates;

use super::initdb::connect;
use crate::config::Settings;

/// One line per template: id, description, amount, frequency and watermark.
pub fn describe(template: &transaction::Model) -> String {
    let frequency = template.frequency.as_deref().unwrap_or("-");
    let launched = template
        .last_launch_date
        .map(|ts| ts.date().to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "#{} {} {} {} (due {}, last generated {})",
        template.id, template.description, template.amount, frequency, template.due_date, launched
    )
}

pub async fn list_templates(settings: &Settings) -> Result<()> {
    let db = connect(&settings.database_url).await?;
    let found = templates::list_templates(&db).await?;
    if found.is_empty() {
        println!("No recurring templates");
    }
    for template in &found {
        println!("{}", describe(template));
    }
    Ok(())
}

pub async fn set_recurring(settings: &Settings, id: i32, frequency: Frequency) -> Result<()> {
    let db = connect(&settings.database_url).await?;
    let updated = templates::mark_recurring(&db, id, frequency).await?;
    println!("{}", describe(&updated));
    Ok(())
}

pub async fn stop_recurring(settings: &Settings, id: i32) -> Result<()> {
    let db = connect(&settings.database_url).await?;
    let updated = templates::stop_recurring(&db, id).await?;
    println!("Stopped #{} {}", updated.id, updated.description);
    Ok(())
}

pub async fn settle(settings: &Settings, id: i32, paid_on: Option<NaiveDate>) -> Result<()> {
    let paid_on = match paid_on {
        Some(day) => day,
        None => settings.clock()?.today(),
    };
    let db = connect(&settings.database_url).await?;
    let paid = templates::settle(&db, id, paid_on).await?;
    println!("Settled #{} {} on {}", paid.id, paid.description, paid_on);
    Ok(())
}

pub async fn delete_transaction(settings: &Settings, id: i32) -> Result<()> {
    let db = connect(&settings.database_url).await?;
    let deleted = templates::delete_transaction(&db, id).await?;
    println!("Deleted #{} {}", deleted.id, deleted.description);
    Ok(())
}
