//! Interactive menu loop.
//!
//! Reads choices and field values line by line from any `BufRead` and writes
//! prompts and results to any `Write`, so the loop runs the same against a
//! terminal or an in-memory buffer.

use std::io::{BufRead, Write};

use anyhow::Result;
use core_catalog::{CatalogLabels, Item, ItemId, ItemPatch};
use core_service::{CatalogService, CoreError};
use tracing::{debug, warn};

use crate::input::{
    parse_count, parse_id, parse_initial_count, parse_year, replacement_text,
};
use crate::render::{capitalize, heading, item_line, year_or_placeholder};

/// What the loop should do after handling one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    service: &'a CatalogService,
    labels: &'static CatalogLabels,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a CatalogService, input: R, output: W) -> Self {
        Self {
            service,
            labels: service.kind().labels(),
            input,
            output,
        }
    }

    /// Run until the user picks exit or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_options()?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                writeln!(self.output)?;
                break;
            };

            debug!(choice = %choice, "Menu choice");
            if self.dispatch(choice.trim()).await? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.register().await?,
            "2" => self.list().await?,
            "3" => self.search().await?,
            "4" => self.edit().await?,
            "5" => self.remove().await?,
            "6" => self.borrow().await?,
            "7" => self.return_item().await?,
            "0" => {
                writeln!(self.output, "Exiting... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.output, "Invalid option. Try again.\n")?,
        }
        Ok(Flow::Continue)
    }

    fn print_options(&mut self) -> Result<()> {
        let entity = self.labels.entity;
        let plural = self.labels.entity_plural;
        writeln!(
            self.output,
            "=== {} Catalog ===",
            capitalize(self.service.kind().as_str())
        )?;
        writeln!(self.output, "1 - Register {}", entity)?;
        writeln!(self.output, "2 - List {}", plural)?;
        writeln!(self.output, "3 - Search {}", plural)?;
        writeln!(self.output, "4 - Edit {}", entity)?;
        writeln!(self.output, "5 - Remove {}", entity)?;
        writeln!(self.output, "6 - Borrow {}", entity)?;
        writeln!(self.output, "7 - Return {}", entity)?;
        writeln!(self.output, "0 - Exit")?;
        Ok(())
    }

    /// Print `label` and read one line. `None` means input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like [`prompt`](Self::prompt) but treats end of input as a blank answer.
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    fn ask_id(&mut self, action: &str) -> Result<Option<ItemId>> {
        let raw = self.ask(&format!("\nID of the {} to {}: ", self.labels.entity, action))?;
        let id = parse_id(&raw);
        if id.is_none() {
            writeln!(self.output, "Invalid ID.\n")?;
        }
        Ok(id)
    }

    fn write_items(&mut self, items: &[Item]) -> Result<()> {
        for item in items {
            writeln!(self.output, "{}", item_line(item))?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Print the user-facing message for an expected failure, propagate the rest.
    fn report(&mut self, err: CoreError) -> Result<()> {
        let entity = capitalize(self.labels.entity);
        if err.is_not_found() {
            writeln!(self.output, "{} not found.\n", entity)?;
        } else if err.is_unavailable() {
            writeln!(self.output, "No copies available.\n")?;
        } else if err.is_invalid_input() {
            writeln!(self.output, "{}\n", err)?;
        } else {
            warn!(error = %err, "Catalog operation failed");
            writeln!(self.output, "Error: {}\n", err)?;
        }
        Ok(())
    }

    async fn register(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", heading(self.labels, "Register"))?;
        let title = self.ask(&format!("{}: ", self.labels.title))?;
        let creator = self.ask(&format!("{}: ", self.labels.creator))?;
        let year = parse_year(&self.ask(&format!("{} (optional): ", self.labels.year))?);
        let count = parse_initial_count(&self.ask(&format!("{} (default 1): ", self.labels.count))?);

        let draft = Item::new(title.trim(), creator.trim())
            .with_year(year)
            .with_available_count(count);

        match self.service.register(draft).await {
            Ok(item) => writeln!(
                self.output,
                "{} registered with ID {}.\n",
                capitalize(self.labels.entity),
                item.id
            )?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn list(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- {} ---", capitalize(self.labels.entity_plural))?;
        match self.service.list().await {
            Ok(items) if items.is_empty() => {
                writeln!(self.output, "No {} registered.\n", self.labels.entity_plural)?
            }
            Ok(items) => self.write_items(&items)?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<()> {
        let term = self.ask(&format!(
            "\nEnter {} or {} to search: ",
            self.labels.title.to_lowercase(),
            self.labels.creator.to_lowercase()
        ))?;
        let term = term.trim().to_string();
        if term.is_empty() {
            writeln!(self.output, "Empty search term.\n")?;
            return Ok(());
        }

        match self.service.search(&term).await {
            Ok(items) if items.is_empty() => writeln!(self.output, "No results found.\n")?,
            Ok(items) => {
                writeln!(self.output, "\nResults for '{}':", term)?;
                self.write_items(&items)?;
            }
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn edit(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("edit")? else {
            return Ok(());
        };
        let current = match self.service.get(id).await {
            Ok(item) => item,
            Err(err) => return self.report(err),
        };

        writeln!(self.output, "Leave blank to keep the current value.")?;
        let title = self.ask(&format!("{} [{}]: ", self.labels.title, current.title))?;
        let creator = self.ask(&format!("{} [{}]: ", self.labels.creator, current.creator))?;
        let year = self.ask(&format!(
            "{} [{}]: ",
            self.labels.year,
            year_or_placeholder(current.year)
        ))?;
        let count = self.ask(&format!(
            "{} [{}]: ",
            self.labels.count, current.available_count
        ))?;

        let patch = ItemPatch {
            title: replacement_text(&title),
            creator: replacement_text(&creator),
            year: parse_year(&year),
            available_count: parse_count(&count),
        };

        match self.service.edit(id, patch).await {
            Ok(_) => writeln!(self.output, "{} updated.\n", capitalize(self.labels.entity))?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn remove(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("remove")? else {
            return Ok(());
        };
        let entity = capitalize(self.labels.entity);
        match self.service.remove(id).await {
            Ok(true) => writeln!(self.output, "{} removed successfully.\n", entity)?,
            Ok(false) => writeln!(self.output, "{} not found.\n", entity)?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn borrow(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("borrow")? else {
            return Ok(());
        };
        match self.service.borrow(id).await {
            Ok(item) => writeln!(
                self.output,
                "{} '{}' borrowed. {} left.\n",
                capitalize(self.labels.entity),
                item.title,
                item.available_count
            )?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn return_item(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("return")? else {
            return Ok(());
        };
        match self.service.return_item(id).await {
            Ok(item) => writeln!(
                self.output,
                "{} '{}' returned. Available: {}.\n",
                capitalize(self.labels.entity),
                item.title,
                item.available_count
            )?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }
}
