use tabled::{settings::Style, Table, Tabled};
use crate::row::Configuration;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct ConfigurationView {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Max Frame")]
    max_frame_size: String,
    #[tabled(rename = "Port-channel")]
    port_channel_id: String,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render stored configurations, one line per row
pub fn configurations_table(configurations: &[Configuration]) -> String {
    let rows: Vec<ConfigurationView> = configurations
        .iter()
        .map(|c| ConfigurationView {
            id: c.id,
            name: c.name.clone(),
            description: or_dash(c.description.as_deref()),
            max_frame_size: or_dash(c.max_frame_size),
            port_channel_id: or_dash(c.port_channel_id),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
