//! Plain-text rendering surface for the terminal shell

use std::collections::HashMap;
use std::fmt::Write;

use ed_core::ViewKey;
use ed_views::format::format_value;
use ed_views::{HistoryChart, RankingChart, Surface, TableModel};

/// Latest content drawn into one panel
#[derive(Default)]
struct Panel {
    heading: String,
    table: Option<TableModel>,
    history: Option<HistoryChart>,
    ranking: Option<RankingChart>,
}

/// Collects what the views draw and prints the displayed panel on demand.
#[derive(Default)]
pub struct TextSurface {
    panels: HashMap<ViewKey, Panel>,
    displayed: Option<ViewKey>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the panel currently on screen.
    pub fn render(&self) -> String {
        let Some(key) = self.displayed else {
            return String::new();
        };
        let Some(panel) = self.panels.get(&key) else {
            return String::new();
        };

        let mut out = String::new();
        if !panel.heading.is_empty() {
            let _ = writeln!(out, "== {} ==", panel.heading);
        }
        if let Some(table) = &panel.table {
            render_table(&mut out, table);
        }
        if let Some(chart) = &panel.history {
            render_history(&mut out, chart);
        }
        if let Some(chart) = &panel.ranking {
            render_ranking(&mut out, chart);
        }
        out
    }

    fn panel(&mut self, key: ViewKey) -> &mut Panel {
        self.panels.entry(key).or_default()
    }
}

impl Surface for TextSurface {
    fn set_displayed(&mut self, panel: ViewKey, displayed: bool) {
        if displayed {
            self.displayed = Some(panel);
        } else if self.displayed == Some(panel) {
            self.displayed = None;
        }
    }

    fn set_heading(&mut self, panel: ViewKey, heading: &str) {
        self.panel(panel).heading = heading.to_string();
    }

    fn draw_table(&mut self, panel: ViewKey, table: &TableModel) {
        self.panel(panel).table = Some(table.clone());
    }

    fn draw_history(&mut self, panel: ViewKey, chart: &HistoryChart) {
        self.panel(panel).history = Some(chart.clone());
    }

    fn draw_ranking(&mut self, panel: ViewKey, chart: &RankingChart) {
        self.panel(panel).ranking = Some(chart.clone());
    }
}

fn render_table(out: &mut String, table: &TableModel) {
    let _ = writeln!(out, "    {}", table.columns.join(" | "));
    for (i, row) in table.rows.iter().enumerate() {
        let _ = writeln!(out, "{:>3} {}", i + 1, row.join(" | "));
    }
    let _ = writeln!(
        out,
        "page {}/{} ({} rows)",
        table.page + 1,
        table.page_count,
        table.total_rows
    );
}

fn render_history(out: &mut String, chart: &HistoryChart) {
    let _ = writeln!(out, "{} (max {})", chart.title, format_value(chart.y_max, 6));
    for year in &chart.years {
        let line = chart.line.iter().find(|p| p.year == *year).map(|p| p.value);
        let bar = chart.bars.iter().find(|p| p.year == *year).map(|p| p.value);
        let _ = write!(out, "  {}  line {}", year, line.map_or("-".to_string(), |v| format_value(v, 6)));
        if let Some(bar) = bar {
            let _ = write!(out, "  school {}", format_value(bar, 6));
        }
        out.push('\n');
    }
}

fn render_ranking(out: &mut String, chart: &RankingChart) {
    let _ = writeln!(out, "Ranking {} (lower is better)", chart.year);
    let mut hidden = 0;
    for bar in &chart.bars {
        match &bar.label {
            Some(label) => {
                if hidden > 0 {
                    let _ = writeln!(out, "    ... {} more", hidden);
                    hidden = 0;
                }
                let marker = if bar.highlighted { '>' } else { ' ' };
                let _ = writeln!(out, "  {}{:<40} {}", marker, label, format_value(bar.value, 6));
            }
            None => hidden += 1,
        }
    }
    if hidden > 0 {
        let _ = writeln!(out, "    ... {} more", hidden);
    }
}
