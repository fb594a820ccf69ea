//! Plain-text terminal dashboard
//!
//! [`render`] is a pure function of one snapshot; [`run`] redraws the latest
//! snapshot at a bounded rate.

use anyhow::Result;
use chrono::Local;
use fmtel_core::{DynoStats, ForzaPacket, Snapshot, Temperature};
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const PEDAL_BAR_WIDTH: usize = 20;

/// Render one snapshot as a block of text
pub fn render(snapshot: &Snapshot, unit: Temperature) -> String {
    let packet = &snapshot.packet;
    let car = &snapshot.car;
    let mut out = String::with_capacity(1024);

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "FMTEL | {}    packet #{} at {}",
        env!("CARGO_PKG_VERSION"),
        snapshot.sequence,
        snapshot.received_at.with_timezone(&Local).format("%H:%M:%S")
    );
    let _ = writeln!(out, "{} {} ({:>4})", car.maker, car.model, car.year);
    out.push('\n');

    render_race_info(&mut out, packet);
    out.push('\n');
    render_tire_temps(&mut out, packet, unit);
    out.push('\n');
    render_car_stats(&mut out, packet);
    out.push('\n');
    render_pedals(&mut out, packet);
    out.push('\n');
    render_dyno(&mut out, &snapshot.dyno);
    out.push('\n');
    out.push_str("ctrl+c: quit\n");

    out
}

fn render_race_info(out: &mut String, packet: &ForzaPacket) {
    let _ = writeln!(out, "Race Info");
    let _ = writeln!(out, "  Position:   {:>2}", packet.race_position);
    let _ = writeln!(out, "  Lap:        {:>2}", packet.lap_number);
    let _ = writeln!(out, "  Lap Time:   {}", packet.fmt_current_lap());
    let _ = writeln!(out, "  Last Lap:   {}", packet.fmt_last_lap());
    let _ = writeln!(out, "  Best Lap:   {}", packet.fmt_best_lap());
    let _ = writeln!(out, "  Race Time:  {}", packet.fmt_current_race_time());
}

fn render_tire_temps(out: &mut String, packet: &ForzaPacket, unit: Temperature) {
    let temps = packet.tire_temps(unit);
    let symbol = unit.symbol();

    let _ = writeln!(out, "Tire Temps");
    let _ = writeln!(out, "          F");
    let _ = writeln!(
        out,
        "  {:>3.0}{symbol} █   █ {:>3.0}{symbol}",
        temps.front_left, temps.front_right
    );
    let _ = writeln!(
        out,
        "  {:>3.0}{symbol} █   █ {:>3.0}{symbol}",
        temps.rear_left, temps.rear_right
    );
    let _ = writeln!(out, "          R");
}

fn render_car_stats(out: &mut String, packet: &ForzaPacket) {
    let boost = packet.boost.max(0.0);

    let _ = writeln!(
        out,
        "Drivetrain:   {:<5}  Car Class:  {:<5}  PI:             {:>4}",
        packet.drivetrain().label(),
        packet.car_class().label(),
        packet.car_performance_index
    );
    let _ = writeln!(
        out,
        "RPM:     {:>5.0} rpm  Horsepower: {:>5} hp  Kilowatts:      {:>4} kw",
        packet.current_engine_rpm,
        packet.horsepower(),
        packet.kilowatts()
    );
    let _ = writeln!(
        out,
        "Gear:    {:>5}      Max RPM:    {:>5.0} rpm Car ID:        {:>5}",
        packet.gear, packet.engine_max_rpm, packet.car_ordinal
    );
    let _ = writeln!(
        out,
        "Speed:   {:>5} km/h Idle RPM:   {:>5.0} rpm Torque:         {:>4.0} nm",
        packet.km_per_hour(),
        packet.engine_idle_rpm,
        packet.torque
    );
    let _ = writeln!(
        out,
        "Speed:   {:>5} mph  Boost:    {:>7.3} psi Torque:         {:>4} ft/lb",
        packet.miles_per_hour(),
        boost,
        packet.foot_pounds()
    );
}

fn render_pedals(out: &mut String, packet: &ForzaPacket) {
    let pedals = packet.pedal_inputs();
    let _ = writeln!(out, "Pedals");
    for (label, value) in [
        ("Throttle", pedals.throttle),
        ("Brake", pedals.brake),
        ("Clutch", pedals.clutch),
    ] {
        let _ = writeln!(
            out,
            "  {:<8} [{}] {:>3}%",
            label,
            pedal_bar(value),
            u32::from(value) * 100 / 255
        );
    }
}

fn render_dyno(out: &mut String, dyno: &DynoStats) {
    let _ = writeln!(out, "Dyno");
    let _ = writeln!(
        out,
        "  Top Speed:  {:>4} km/h {:>4} mph",
        dyno.top_speed.km_per_hour, dyno.top_speed.miles_per_hour
    );
    let _ = writeln!(
        out,
        "  Max Torque: {:>4.0} nm   {:>4} ft/lb",
        dyno.max_newton_meters, dyno.max_foot_pounds
    );
    let _ = writeln!(
        out,
        "  Max Power:  {:>4} hp   {:>4} kw",
        dyno.max_horsepower, dyno.max_kilowatts
    );

    // reverse first, then forward gears
    let _ = write!(out, "  Gear  {:>4}", "R");
    for gear in 1..dyno.top_speed_per_gear.len() {
        let _ = write!(out, " {:>4}", gear);
    }
    out.push('\n');
    let _ = write!(out, "  km/h");
    for speed in &dyno.top_speed_per_gear {
        let _ = write!(out, " {:>4}", speed.km_per_hour);
    }
    out.push('\n');
    let _ = write!(out, "  mph ");
    for speed in &dyno.top_speed_per_gear {
        let _ = write!(out, " {:>4}", speed.miles_per_hour);
    }
    out.push('\n');
}

fn pedal_bar(value: u8) -> String {
    let filled = usize::from(value) * PEDAL_BAR_WIDTH / 255;
    format!("{}{}", "#".repeat(filled), ".".repeat(PEDAL_BAR_WIDTH - filled))
}

/// Redraw loop
///
/// Always takes snapshots off the channel as they arrive but draws at most
/// once per `refresh_interval`, and only when something new arrived.
pub async fn run(
    mut rx: mpsc::Receiver<Arc<Snapshot>>,
    unit: Temperature,
    refresh_interval: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pending: Option<Arc<Snapshot>> = None;

    let mut stdout = std::io::stdout();
    // clear screen, hide cursor
    write!(stdout, "\x1b[2J\x1b[?25l")?;
    stdout.flush()?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            snapshot = rx.recv() => match snapshot {
                Some(snapshot) => pending = Some(snapshot),
                None => break,
            },
            _ = ticker.tick() => {
                if let Some(snapshot) = pending.take() {
                    let frame = render(&snapshot, unit);
                    // home, frame, clear to end of screen
                    write!(stdout, "\x1b[H{}\x1b[J", frame)?;
                    stdout.flush()?;
                }
            }
        }
    }

    write!(stdout, "\x1b[?25h")?;
    stdout.flush()?;
    Ok(())
}
