use crate::resolve::ResolveStats;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `IFCONF_QUIET=1` silences human-facing output; logs are unaffected.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("IFCONF_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        icon.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn phase(name: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("{} {}", Icons::GEAR.style(theme().info.clone()), name.style(theme().header.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// Cross-reference phase report shared by `load` and `resolve`
pub fn resolve_summary(stats: &ResolveStats) {
    if is_quiet() {
        return;
    }
    phase("Cross-reference");
    summary_row("Port-channels:", &stats.port_channels.to_string());
    summary_row("Ethernets:", &stats.ethernets.to_string());
    summary_row("Members:", &stats.members.to_string());

    let linked = stats.updated.to_string();
    let linked = if stats.updated > 0 {
        linked.style(theme().linked.clone()).to_string()
    } else {
        muted(&linked)
    };
    summary_row("Linked:", &linked);
}
