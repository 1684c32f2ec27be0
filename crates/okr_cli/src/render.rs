//! Plain text rendering of dashboard data.

use okr_core::{
    derive_status, format_value, key_result_progress, objective_progress, progress_label,
    KeyResult, Objective, StatusBreakdown,
};
use std::fmt::Write;

/// One line per objective: id, derived status, progress, owner, title.
pub fn objective_row(objective: &Objective) -> String {
    format!(
        "{:<38} {:<12} {:>4}  {:<20} {}",
        objective.id,
        derive_status(objective).as_str(),
        progress_label(objective_progress(objective)),
        objective.owner,
        objective.title
    )
}

pub fn objective_table(objectives: &[Objective]) -> String {
    if objectives.is_empty() {
        return "no objectives\n".to_string();
    }
    let mut out = String::new();
    for objective in objectives {
        out.push_str(&objective_row(objective));
        out.push('\n');
    }
    out
}

/// `  Title: current / target (from start) 75%`
pub fn key_result_line(kr: &KeyResult) -> String {
    format!(
        "  {}: {} / {} (from {}) {}",
        kr.title,
        format_value(kr.current_value, kr.kind),
        format_value(kr.target_value, kr.kind),
        format_value(kr.start_value, kr.kind),
        progress_label(key_result_progress(kr))
    )
}

pub fn objective_detail(objective: &Objective) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", objective.title);
    let _ = writeln!(out, "id:       {}", objective.id);
    let _ = writeln!(out, "owner:    {}", objective.owner);
    let _ = writeln!(
        out,
        "status:   {} ({})",
        derive_status(objective).as_str(),
        progress_label(objective_progress(objective))
    );
    let _ = writeln!(out, "\n{}", objective.description);
    if let Some(why) = &objective.why_is_important {
        let _ = writeln!(out, "\nWhy it matters: {why}");
    }

    let _ = writeln!(out, "\nKey Results:");
    for kr in &objective.key_results {
        let _ = writeln!(out, "{}", key_result_line(kr));
        let _ = writeln!(out, "    measured by {}", kr.how_it_is_measured);
    }

    for (label, update) in [
        ("Q2 update", &objective.q2_status_update),
        ("Q3 update", &objective.q3_status_update),
        ("Final update", &objective.final_status_update),
    ] {
        if let Some(text) = update {
            let _ = writeln!(out, "\n{label}: {text}");
        }
    }
    out
}

pub fn summary(breakdown: &StatusBreakdown, owners: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "objectives: {}", breakdown.total());
    for (status, count) in breakdown.iter() {
        let _ = writeln!(out, "  {:<12} {count}", status.as_str());
    }
    let _ = writeln!(out, "owners: {}", owners.join(", "));
    out
}
