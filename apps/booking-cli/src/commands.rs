//! Subcommand implementations. Text goes to stdout, logs to stderr.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::BookArgs;
use salon_booking::{BookingConfig, BookingSession, DataSource, DataSourceSink};
use salon_core::schedule::available_slots;
use salon_core::stats::weekly_buckets;
use salon_core::validation::parse_date;
use salon_core::{BookingRecord, CustomerInfo, Transition};

fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(parse_date(d)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn catalog(source: &dyn DataSource, json: bool) -> Result<()> {
    let catalog = source.load_catalog().await?;
    if json {
        return print_json(&catalog);
    }

    for group in catalog.services_by_category() {
        println!("{}", group.category);
        for s in group.items {
            println!(
                "  {:<20} {:<24} {:>4} min  {:>8}",
                s.id,
                s.name,
                s.duration_minutes,
                s.price().to_string()
            );
        }
    }
    println!();
    println!("Staff");
    for e in catalog.employees() {
        println!("  {:<20} {:<24} {}", e.id, e.name, e.specialties.join(", "));
    }
    Ok(())
}

pub async fn slots(
    source: &dyn DataSource,
    config: &BookingConfig,
    date: Option<&str>,
    employee: Option<&str>,
    service: Option<&str>,
    json: bool,
) -> Result<()> {
    let date = date_or_today(date)?;
    let schedule = config.slot_schedule()?;

    let free: BTreeSet<String> = match employee {
        Some(employee_id) => {
            let catalog = source.load_catalog().await?;
            catalog.employee(employee_id)?;
            let duration = match service {
                Some(id) => catalog.service(id)?.duration_minutes,
                None => schedule.interval_minutes(),
            };
            let booked = source.appointments_on(date).await?;
            available_slots(&schedule, date, &booked, employee_id, duration)
                .into_iter()
                .collect()
        }
        None => schedule.all_slots().into_iter().collect(),
    };

    let mut buckets = schedule.buckets();
    for bucket in &mut buckets {
        bucket.slots.retain(|s| free.contains(s));
    }
    buckets.retain(|b| !b.slots.is_empty());

    if json {
        return print_json(&buckets);
    }

    println!("{}", date);
    for bucket in buckets {
        println!("  {:02}  {}", bucket.hour, bucket.slots.join("  "));
    }
    Ok(())
}

/// Drives a session from SERVICE to CONFIRM and waits for the hand-off.
pub async fn book(
    source: Arc<dyn DataSource>,
    config: &BookingConfig,
    args: &BookArgs,
    json: bool,
) -> Result<BookingRecord> {
    let date = date_or_today(args.date.as_deref())?;
    let sink = Arc::new(DataSourceSink::new(source.clone()));

    let mut session = BookingSession::open(
        source.clone(),
        sink,
        config.slot_schedule()?,
        date,
        CancellationToken::new(),
    )
    .await
    .context("catalog load was cancelled")?;

    if session.catalog().is_empty() {
        bail!("catalog is empty; seed the database first");
    }

    for id in &args.services {
        session.adjust_quantity(id, 1)?;
    }
    session.next()?;

    session.select_employee(&args.employee)?;
    session.next()?;

    session.select_time_slot(&args.time)?;
    session.next()?;

    session.set_customer(CustomerInfo::new(&args.name, &args.email, &args.phone))?;
    let Transition::Completed(record) = session.next()? else {
        bail!("wizard did not reach confirmation");
    };
    session.flush().await;

    let saved = source
        .appointments_on(date)
        .await?
        .iter()
        .any(|a| a.employee_id == record.employee_id && a.start_at == record.start_at);
    if !saved {
        warn!(employee_id = %record.employee_id, start_at = %record.start_at, "Booking was not saved");
        bail!("booking was confirmed but could not be saved; see log for details");
    }
    info!(source = source.name(), "Booking saved");

    if json {
        print_json(&record)?;
    } else {
        let totals = session.totals();
        println!("Booked {} with {} on {}", record.service_id, record.employee_id, record.start_at);
        println!(
            "  {} item(s), {} min, {} ({} points)",
            totals.total_items_count,
            totals.total_duration_minutes,
            totals.total_price,
            totals.total_points
        );
    }
    Ok(record)
}

pub async fn stats(source: &dyn DataSource, date: Option<&str>, weekly: bool, json: bool) -> Result<()> {
    if weekly {
        let appointments = source.list_appointments().await?;
        let services = source.list_services().await?;
        let weeks = weekly_buckets(&appointments, &services);
        if json {
            return print_json(&weeks);
        }
        for w in weeks {
            println!("  week of {}  {:>4} appts  {:>10}", w.week_start, w.appointment_count, w.revenue.to_string());
        }
        return Ok(());
    }

    let stats = source.daily_stats(date_or_today(date)?).await?;
    if json {
        return print_json(&stats);
    }
    println!("{}", stats.date);
    println!("  appointments   {}", stats.appointment_count);
    println!("  completed      {}", stats.completed_count);
    println!("  cancelled      {}", stats.cancelled_count);
    println!("  revenue        {}", stats.revenue);
    println!("  new customers  {}", stats.new_customers);
    Ok(())
}

pub fn show_config(config: &BookingConfig, save: bool, path: Option<PathBuf>) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if save {
        config.save(path)?;
    }
    Ok(())
}
