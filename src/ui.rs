use colored::*;

use crate::models::notification::Notification;
use crate::models::project::{Project, ProjectStatus};
use crate::timeline::{TimelineGrid, status_color};

/// Width of the project-name column in the gantt view
const NAME_COLUMN_WIDTH: usize = 16;

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// "#RRGGBB" to an rgb triple; anything else renders as neutral gray
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return (136, 136, 136);
    }
    match (
        u8::from_str_radix(&digits[0..2], 16),
        u8::from_str_radix(&digits[2..4], 16),
        u8::from_str_radix(&digits[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => (r, g, b),
        _ => (136, 136, 136),
    }
}

/// Status dot tinted with the status palette color
pub fn status_glyph(status: ProjectStatus) -> ColoredString {
    let (r, g, b) = hex_to_rgb(status_color(status));
    "●".truecolor(r, g, b)
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let noun = if count == 1 { "project" } else { "projects" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, noun);
}

/// Render a section header (e.g. a kanban column)
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render a single project line with id, status, name, progress and dates,
/// with the manager right-aligned when the terminal leaves room for it.
pub fn render_project_line(project: &Project) {
    let terminal_width = get_terminal_width();

    let left_section = format!(
        "  {}  {}  {}  {:>3}%  {} → {}",
        project.project_id.dimmed(),
        status_glyph(project.status),
        project.name.bold(),
        project.progress,
        project.start_date,
        project.end_date,
    );
    let left_visible_len = format!(
        "  {}  {}  {}  {:>3}%  {} → {}",
        project.project_id, "●", project.name, project.progress, project.start_date,
        project.end_date,
    )
    .chars()
    .count();

    let right_section = project.manager.clone();
    let total_content = left_visible_len + right_section.chars().count();

    if !right_section.is_empty() && total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left_section, " ".repeat(padding), right_section.dimmed());
    } else {
        println!("{}", left_section);
    }
}

/// Render a detail card for a single project
pub fn render_project_details(project: &Project) {
    render_view_header(&project.name, 1);
    println!("  ID:             {}", project.project_id);
    println!("  Status:         {} {}", status_glyph(project.status), project.status);
    println!("  Progress:       {}%", project.progress);
    println!("  Manager:        {}", project.manager);
    println!("  Assignees:      {}", project.assignment.join(", "));
    println!("  Start:          {}", project.start_date);
    println!("  End:            {}", project.end_date);
    println!("  Priority:       {}", project.priority);
    if !project.dependency.is_empty() {
        println!("  Depends on:     {}", project.dependency);
    }
    if !project.estimated_time.is_empty() {
        println!("  Estimated:      {}", project.estimated_time);
    }
    if !project.description.is_empty() {
        println!("  Description:    {}", project.description);
    }
    if !project.attachments.is_empty() {
        println!("  Attachments:    {}", project.attachments.join(", "));
    }
}

/// Render projects grouped into one column per status, kanban style
pub fn render_kanban(projects: &[Project]) {
    for status in ProjectStatus::all() {
        let column: Vec<&Project> = projects.iter().filter(|p| p.status == status).collect();
        if column.is_empty() {
            continue;
        }
        render_section_header(&format!("{} ({})", status, column.len()));
        for project in column {
            render_project_line(project);
        }
    }
}

pub fn render_notification_line(notification: &Notification) {
    println!(
        "  {}  {} {} {}",
        notification.time_str.dimmed(),
        notification.username.bold(),
        notification.action,
        notification.project_id,
    );
}

/// Render the gantt view: month header bands, a day row, one bar per
/// project split into done/remaining segments, and the now marker.
pub fn render_gantt(grid: &TimelineGrid, projects: &[Project]) {
    let cell = grid.cell_width.max(1) as usize;
    let grid_width = grid.width() as usize;

    // Month-year bands, centered over their run of days
    let mut month_row = " ".repeat(NAME_COLUMN_WIDTH);
    for band in grid.month_bands() {
        let width = band.width(grid.cell_width) as usize;
        let label = band.label();
        if label.chars().count() >= width {
            let truncated: String = label.chars().take(width.saturating_sub(1)).collect();
            month_row.push_str(&format!("{:<width$}", truncated, width = width));
        } else {
            let pad = width - label.chars().count();
            let left = pad / 2;
            month_row.push_str(&" ".repeat(left));
            month_row.push_str(&label);
            month_row.push_str(&" ".repeat(pad - left));
        }
    }
    println!("{}", month_row.bold());

    // Day-of-month row
    let mut day_row = " ".repeat(NAME_COLUMN_WIDTH);
    for day in grid.days() {
        day_row.push_str(&format!("{:>width$}", day.day(), width = cell));
    }
    println!("{}", day_row.dimmed());

    println!(
        "{}{}",
        " ".repeat(NAME_COLUMN_WIDTH),
        "─".repeat(grid_width).dimmed()
    );

    for project in projects {
        let name: String = if project.name.chars().count() > NAME_COLUMN_WIDTH - 2 {
            let mut truncated: String = project
                .name
                .chars()
                .take(NAME_COLUMN_WIDTH - 3)
                .collect();
            truncated.push('…');
            truncated
        } else {
            project.name.clone()
        };
        print!("{:<width$}", name, width = NAME_COLUMN_WIDTH);

        let Some(bar) = grid.bar(project) else {
            println!();
            continue;
        };

        // Clip the bar to the visible grid span
        let x = bar.x as usize;
        if x >= grid_width {
            println!();
            continue;
        }
        let visible = (bar.width as usize).min(grid_width - x);
        let done = (bar.done_width.max(0) as usize).min(visible);

        let (dr, dg, db) = hex_to_rgb(&bar.done_color);
        let (rr, rg, rb) = hex_to_rgb(&bar.remaining_color);

        print!("{}", " ".repeat(x));
        print!("{}", "█".repeat(done).truecolor(dr, dg, db));
        print!("{}", "█".repeat(visible - done).truecolor(rr, rg, rb));
        println!(" {}%", bar.progress);
    }

    if let Some(marker_x) = grid.now_marker() {
        let col = (marker_x.round() as usize).min(grid_width.saturating_sub(1));
        println!(
            "{}{}",
            " ".repeat(NAME_COLUMN_WIDTH + col),
            "▲ now".red().bold()
        );
    }
}
