//! Terminal presentation of ranking pages.

use std::io::Write;
use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::settings::{Settings, SettingsHandle, Theme};
use crate::sync::ViewState;
use crate::types::RankingRecord;

/// Receives every new frame produced by the coordinator.
pub trait Presenter {
    fn render(&mut self, view: &ViewState);
}

/// A row in the ranking table
#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: u32,
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Score")]
    score: i64,
    #[tabled(rename = "PP")]
    pp: f64,
    #[tabled(rename = "Delta")]
    delta: f64,
    #[tabled(rename = "ID")]
    id: u64,
}

impl RankingRow {
    fn new(record: &RankingRecord, starred: bool) -> Self {
        let player = if starred {
            format!("* {}", record.display_name)
        } else {
            record.display_name.clone()
        };
        Self {
            rank: record.rank,
            player,
            score: record.score_value,
            pp: record.pp_value,
            delta: record.delta,
            id: record.id,
        }
    }
}

/// One-line pager summary, e.g. `Page 2 of 3 (23 results)`.
pub fn format_status_line(view: &ViewState) -> String {
    let mut line = format!(
        "Page {} of {} ({} results)",
        view.current_page, view.total_pages, view.total_results
    );
    if !view.query.trim().is_empty() {
        line.push_str(&format!(" matching \"{}\"", view.query.trim()));
    }
    if view.searching {
        line.push_str(" [searching]");
    }
    line
}

/// Aggregate figures shown above the table.
pub fn format_metadata_line(view: &ViewState) -> String {
    format!(
        "Recently inactive: {}  Total inactives: {}",
        view.metadata.recently_inactive, view.metadata.total_inactives
    )
}

/// Render the rows of one page as a table.
pub fn format_table(rows: &[RankingRecord], settings: &SettingsHandle) -> String {
    let snapshot = settings.snapshot();
    let rows: Vec<RankingRow> = rows
        .iter()
        .map(|record| RankingRow::new(record, snapshot.is_starred(record.id)))
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Presenter printing each distinct frame to a writer.
pub struct TablePresenter<W: Write> {
    out: W,
    settings: SettingsHandle,
    last: Option<(ViewState, Arc<Settings>)>,
}

impl<W: Write> TablePresenter<W> {
    pub fn new(out: W, settings: SettingsHandle) -> Self {
        Self {
            out,
            settings,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, view: &ViewState) -> std::io::Result<()> {
        let theme = self.settings.snapshot().theme;

        if let Some(selection) = view.selection {
            writeln!(self.out, "{}", paint_heading(&selection.to_string(), theme))?;
        }

        if view.loading {
            writeln!(self.out, "{}", paint_dim("Loading data...", theme))?;
            return Ok(());
        }

        if let Some(message) = &view.error_message {
            writeln!(
                self.out,
                "{}",
                paint_error(&format!("Failed to fetch data: {message}"), theme)
            )?;
        }

        writeln!(self.out, "{}", format_metadata_line(view))?;
        if view.rows.is_empty() {
            writeln!(self.out, "{}", paint_dim("No results.", theme))?;
        } else {
            writeln!(self.out, "{}", format_table(&view.rows, &self.settings))?;
        }
        writeln!(self.out, "{}", paint_dim(&format_status_line(view), theme))?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for TablePresenter<W> {
    fn render(&mut self, view: &ViewState) {
        let settings = self.settings.snapshot();
        if let Some((last_view, last_settings)) = &self.last
            && last_view == view
            && *last_settings == settings
        {
            return;
        }
        if let Err(e) = self.write_frame(view) {
            tracing::warn!("Failed to render ranking page: {e}");
        }
        self.last = Some((view.clone(), settings));
    }
}

fn paint_heading(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Colored => text.bold().to_string(),
        Theme::Plain => text.to_string(),
    }
}

fn paint_dim(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Colored => text.dimmed().to_string(),
        Theme::Plain => text.to_string(),
    }
}

fn paint_error(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Colored => text.red().to_string(),
        Theme::Plain => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScoreMetadata, Selection, make_record};

    fn view(rows: Vec<RankingRecord>) -> ViewState {
        ViewState {
            total_results: 23,
            rows,
            current_page: 2,
            total_pages: 3,
            rows_per_page: 9,
            table_height: 340,
            loading: false,
            searching: false,
            error_message: None,
            query: String::new(),
            metadata: ScoreMetadata {
                recently_inactive: 3,
                total_inactives: 40,
            },
            selection: Some(Selection::new(7, 0)),
        }
    }

    fn plain_settings() -> SettingsHandle {
        SettingsHandle::new(Settings::default().with_theme(Theme::Plain))
    }

    #[test]
    fn test_status_line() {
        insta::assert_snapshot!(format_status_line(&view(vec![])), @"Page 2 of 3 (23 results)");
    }

    #[test]
    fn test_status_line_with_query() {
        let mut view = view(vec![]);
        view.query = " alice ".to_string();
        view.searching = true;
        insta::assert_snapshot!(
            format_status_line(&view),
            @r#"Page 2 of 3 (23 results) matching "alice" [searching]"#
        );
    }

    #[test]
    fn test_table_marks_starred_rows() {
        let settings = plain_settings();
        settings.update(|s| s.with_star_toggled(100));
        let table = format_table(&[make_record(1, "alice"), make_record(2, "bob")], &settings);

        assert!(table.contains("* alice"));
        assert!(!table.contains("* bob"));
        assert!(table.contains("Player"));
    }

    #[test]
    fn test_presenter_skips_identical_frames() {
        let mut presenter = TablePresenter::new(Vec::new(), plain_settings());
        let frame = view(vec![make_record(1, "alice")]);

        presenter.render(&frame);
        let first_len = presenter.out.len();
        presenter.render(&frame);

        assert_eq!(presenter.out.len(), first_len);
        let output = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(output.contains("alice"));
        assert!(output.contains("Recently inactive: 3"));
    }

    #[test]
    fn test_presenter_redraws_after_settings_change() {
        let settings = plain_settings();
        let mut presenter = TablePresenter::new(Vec::new(), settings.clone());
        let frame = view(vec![make_record(1, "alice")]);

        presenter.render(&frame);
        settings.update(|s| s.with_star_toggled(100));
        presenter.render(&frame);

        let output = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(output.contains("* alice"));
    }

    #[test]
    fn test_presenter_shows_loading_and_error() {
        let mut presenter = TablePresenter::new(Vec::new(), plain_settings());
        let mut loading = view(vec![]);
        loading.loading = true;
        presenter.render(&loading);

        let mut failed = view(vec![]);
        failed.error_message = Some("Network Error".to_string());
        presenter.render(&failed);

        let output = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(output.contains("Loading data..."));
        assert!(output.contains("Failed to fetch data: Network Error"));
        assert!(output.contains("No results."));
    }
}
