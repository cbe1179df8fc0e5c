//! stats-runner: headless dashboard runner for the gym back office.
//!
//! Usage:
//!   stats-runner --data dataset.json --date 2025-05-15 --unit month
//!   stats-runner --data dataset.json --unit week --status completed --json
//!   stats-runner --data dataset.json --today 2025-06-01 --config stats.json

use anyhow::Result;
use gymdesk_core::{
    clock::{Clock, FixedClock, SystemClock},
    config::StatsConfig,
    dashboard::{Dashboard, DashboardSnapshot},
    date_range::format_date,
    quick_range::QuickRangeNavigator,
    records::{Dataset, StatusFilter},
    types::Granularity,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_mode = args.iter().any(|a| a == "--json");
    let data = find_arg(&args, "--data").unwrap_or("./dataset.json");

    let config = match find_arg(&args, "--config") {
        Some(path) => StatsConfig::load(path)?,
        None => StatsConfig::default(),
    };

    // --today pins the clock so runs are reproducible.
    let clock: Box<dyn Clock> = match find_arg(&args, "--today") {
        Some(today) => Box::new(FixedClock::parse(today)?),
        None => Box::new(SystemClock),
    };

    let today = format_date(clock.today());
    let anchor = find_arg(&args, "--date").unwrap_or(&today);
    let unit = match find_arg(&args, "--unit") {
        Some(u) => Granularity::parse(u).ok_or_else(|| anyhow::anyhow!("Unknown unit: {u}"))?,
        None => config.default_granularity,
    };
    let filter = StatusFilter::parse(find_arg(&args, "--status").unwrap_or("all"))?;

    let dataset = Dataset::load(data)?;
    log::info!("building {} dashboard at {anchor} (today {today})", unit.name());
    let snapshot = Dashboard::for_anchor(&dataset, anchor, unit, filter, clock.as_ref(), &config)?;

    if json_mode {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    println!("Gym back office: stats-runner");
    println!("  data:      {data}");
    println!("  today:     {today}");
    println!("  anchor:    {anchor}");
    println!("  unit:      {}", unit.name());
    println!("  status:    {filter:?}");
    println!();

    print_quick_ranges(clock.as_ref(), anchor)?;
    print_summary(&snapshot);
    Ok(())
}

fn print_quick_ranges(clock: &dyn Clock, anchor: &str) -> Result<()> {
    let navigator = QuickRangeNavigator::new(clock, anchor)?;
    println!("=== QUICK RANGES ===");
    for entry in navigator.resolve_all()? {
        println!(
            "  {:<11} current {} | prev {} | next {}",
            entry.label, entry.current, entry.prev, entry.next
        );
    }
    println!();
    Ok(())
}

fn print_summary(snapshot: &DashboardSnapshot) {
    let rev = &snapshot.revenue;
    let mem = &snapshot.membership;

    println!("=== DASHBOARD {} ===", snapshot.range);
    println!(
        "  revenue:          {:.0} (prev {:.0}, {:+.1}%)",
        rev.total_revenue.current, rev.total_revenue.previous, rev.total_revenue.growth_percent
    );
    println!(
        "  payments:         {:.0} (prev {:.0}, {:+.1}%)",
        rev.payment_count.current, rev.payment_count.previous, rev.payment_count.growth_percent
    );
    println!(
        "  avg payment:      {:.0} ({:+.1}%)",
        rev.average_payment.current, rev.average_payment.growth_percent
    );
    println!(
        "  new members:      {:.0} (prev {:.0}, {:+.1}%)",
        mem.new_members.current, mem.new_members.previous, mem.new_members.growth_percent
    );
    println!("  active members:   {}", mem.active_members);
    println!("  expired members:  {}", mem.expired_members);
    println!("  expiring soon:    {}", mem.expiring_soon);
    println!("  retention:        {:.1}%", mem.retention_rate);
    println!(
        "  consult complete: {:.1}%",
        snapshot.consultation_completion.current * 100.0
    );
    if rev.skipped_records + mem.skipped_records > 0 {
        println!(
            "  skipped rows:     {}",
            rev.skipped_records + mem.skipped_records
        );
    }

    println!();
    println!("=== STAFF RANKING ===");
    if snapshot.staff_ranking.is_empty() {
        println!("  (No staff)");
    }
    for (i, s) in snapshot.staff_ranking.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>3} pts | rev {:.1} reg {:.0} con {:.0}",
            i + 1,
            s.name,
            s.total,
            s.sub_scores.revenue,
            s.sub_scores.registration,
            s.sub_scores.consultation,
        );
    }

    println!();
    println!("=== CONSULTATIONS ({} total) ===", snapshot.consultation_summary.total);
    for b in &snapshot.consultation_summary.buckets {
        println!("  {:<12} {:>4}  {:>5.1}%", b.category, b.count, b.percent);
    }

    println!();
    println!("=== PAYMENTS ({} total) ===", snapshot.payment_summary.total);
    for b in &snapshot.payment_summary.buckets {
        println!("  {:<12} {:>4}  {:>5.1}%", b.category, b.count, b.percent);
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
