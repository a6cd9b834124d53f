use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use crawldash_core::{AppViewModel, DetailViewModel, JobRowView, NoticeSeverity, Screen};

const RULE: &str = "------------------------------------------------------------";

/// Renders the whole view model as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    if let Some(notice) = &view.notice {
        let marker = match notice.severity {
            NoticeSeverity::Info => "*",
            NoticeSeverity::Error => "!",
        };
        let _ = writeln!(out, "{marker} {}: {}", notice.title, notice.description);
    }

    match (view.screen, &view.detail) {
        (Screen::Detail, Some(detail)) => render_detail(&mut out, detail),
        _ => render_list(&mut out, view),
    }
    out
}

fn render_list(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Crawl Jobs");
    if view.creating {
        let _ = writeln!(out, "(creating job...)");
    }
    let _ = writeln!(out, "{RULE}");

    if view.jobs_loading {
        let _ = writeln!(out, "Loading jobs...");
        return;
    }
    if view.jobs.is_empty() {
        let _ = writeln!(out, "No jobs created yet. Create your first crawl job with `create <url>`.");
        return;
    }

    let _ = writeln!(
        out,
        "{:<12} {:<10} {:>6}  {:<19}  {:<19}  URL",
        "ID", "STATUS", "PAGES", "STARTED", "FINISHED"
    );
    for job in &view.jobs {
        let _ = writeln!(out, "{}", job_row(job));
    }
}

fn job_row(job: &JobRowView) -> String {
    format!(
        "{:<12} {:<10} {:>6}  {:<19}  {:<19}  {}",
        job.job_id.as_str(),
        job.status.label(),
        job.total_docs.map_or_else(|| "-".to_string(), |n| n.to_string()),
        format_time(job.started_at),
        job.finished_at.map_or_else(|| "-".to_string(), format_time),
        job.url
    )
}

fn render_detail(out: &mut String, detail: &DetailViewModel) {
    let _ = writeln!(out, "{RULE}");
    let Some(job) = &detail.job else {
        let _ = writeln!(out, "Loading job details...");
        return;
    };
    let _ = writeln!(out, "{}", job.url);
    let progress = match job.total_docs {
        Some(total) if total > 0 => format!("{total} documents"),
        _ => "Crawling...".to_string(),
    };
    let _ = writeln!(
        out,
        "[{}] {} | Started: {}",
        job.status.label(),
        progress,
        format_time(job.started_at)
    );
    let _ = writeln!(out, "{RULE}");

    if detail.query.is_empty() {
        let _ = writeln!(out, "Documents");
    } else {
        let _ = writeln!(out, "Documents matching {:?}", detail.query);
    }
    if detail.documents_loading {
        let _ = writeln!(out, "  Loading documents...");
    } else if detail.documents.is_empty() {
        let _ = writeln!(out, "  No documents found");
    } else {
        for doc in &detail.documents {
            let marker = if doc.selected { '>' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {:<8} {}  <{}>",
                doc.document_id.as_str(),
                doc.title,
                doc.url
            );
        }
    }

    let _ = writeln!(out, "{RULE}");
    match &detail.preview {
        Some(preview) => {
            let _ = writeln!(out, "Preview: {}", preview.heading);
            let _ = writeln!(out, "-- markdown --\n{}", preview.markdown);
            let _ = writeln!(out, "-- html --\n{}", preview.html);
            let _ = writeln!(out, "-- metadata --\n{}", preview.metadata);
        }
        None => {
            let _ = writeln!(out, "Select a document from the list to view its content");
        }
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
