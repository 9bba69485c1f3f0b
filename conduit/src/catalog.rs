//! `conduit backends` table

use std::fmt::Write;

use conduit_routing::{Backend, Tier};
use strum::IntoEnumIterator;

/// Render the catalog, one row per backend, with a column per tier
pub fn render() -> String {
    let tiers: Vec<Tier> = Tier::iter().collect();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write!(out, "{:<28} {:<22} {:>9} {:>8}", "BACKEND", "FAMILY", "USD/1K", "MS");
    for tier in &tiers {
        let _ = write!(out, " {:<10}", tier.to_string().to_uppercase());
    }
    out.push('\n');

    for backend in Backend::ALL {
        let family = backend.protocol().to_string();
        let cost = format!("{:.5}", backend.cost_per_1k());
        let _ = write!(out, "{:<28} {family:<22} {cost:>9} {:>8}", backend.id(), backend.latency_ms());
        for tier in &tiers {
            let _ = write!(out, " {:<10}", if tier.permits(backend) { "yes" } else { "-" });
        }
        out.push('\n');
    }

    out
}
