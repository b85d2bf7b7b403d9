//! Text-mode spoke: numbered checkbox rows toggled by typing their number.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::error::Result;
use crate::proxy::PackageRemoveProxy;
use crate::spoke::SpokeModel;

pub const TITLE: &str = "Package to remove";

const DEFAULT_COLUMNS: usize = 3;
const PROMPT: &str =
    "Please make a selection from the above ['c' to continue, 'q' to quit, 'r' to refresh]: ";

/// What the user typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Toggle(usize),
    Continue,
    Refresh,
    Invalid,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "c" | "C" | "q" | "Q" => Input::Continue,
        "r" | "R" | "" => Input::Refresh,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Toggle(n - 1),
            _ => Input::Invalid,
        },
    }
}

pub struct TextSpoke<'a> {
    model: SpokeModel,
    proxy: &'a mut dyn PackageRemoveProxy,
    columns: usize,
}

impl<'a> TextSpoke<'a> {
    pub fn new(proxy: &'a mut dyn PackageRemoveProxy) -> Self {
        Self {
            model: SpokeModel::new(),
            proxy,
            columns: DEFAULT_COLUMNS,
        }
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn model(&self) -> &SpokeModel {
        &self.model
    }

    /// Run the spoke until the user leaves it, then apply the selection.
    ///
    /// End of input counts as leaving. Returns the applied selection.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<Vec<String>> {
        self.model.initialize(&mut *self.proxy)?;
        info!("Text spoke entered with {} packages", self.model.len());

        loop {
            self.render(&mut output)?;
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            match parse_input(&line) {
                Input::Continue => break,
                Input::Refresh => {}
                Input::Toggle(index) => {
                    if !self.model.toggle(index) {
                        writeln!(output, "Invalid selection")?;
                    }
                }
                Input::Invalid => writeln!(output, "Invalid selection")?,
            }
        }

        self.model.apply(&mut *self.proxy)?;
        let selection = self.model.checked();
        debug!("Text spoke applied: {:?}", selection);
        Ok(selection)
    }

    fn render<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output)?;
        writeln!(output, "{}", "=".repeat(80))?;
        writeln!(output, "{}", TITLE)?;
        writeln!(output)?;
        for line in render_rows(&self.model, self.columns) {
            writeln!(output, "{}", line)?;
        }
        writeln!(output)?;
        writeln!(output, "{}", self.model.status())?;
        writeln!(output, "{}", "=".repeat(80))?;
        Ok(())
    }
}

/// Lay the rows out as numbered checkboxes, `columns` per line
pub fn render_rows(model: &SpokeModel, columns: usize) -> Vec<String> {
    let cells: Vec<String> = model
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mark = if row.checked { "x" } else { " " };
            format!("{}) [{}] {}", i + 1, mark, row.name)
        })
        .collect();

    let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0) + 2;

    cells
        .chunks(columns.max(1))
        .map(|chunk| {
            let line: String = chunk
                .iter()
                .map(|cell| format!("{:<width$}", cell, width = width))
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
