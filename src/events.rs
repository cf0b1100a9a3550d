use crate::errors::IngestError;
use chrono::{Datelike, Local};
use log::{info, warn};
use regex::Regex;
use rusqlite::{params, Connection};
use scraper::{ElementRef, Html, Selector};

/// Leading 1-4 digit year, a dash (hyphen, en dash or em dash) with
/// optional surrounding whitespace, then the description up to the end
/// of the first line.
const YEAR_DASH_PATTERN: &str = r"^(\d{1,4})\s*[–\-—]\s*(.+)";

const EVENT_CATEGORY: &str = "Historical Event";
const MAX_DESCRIPTION_CHARS: usize = 500;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// URL of the "on this day" page for a month/day pair.
pub fn page_url(month: u32, day: u32) -> String {
    let month_name = MONTH_NAMES[month as usize - 1];
    format!("https://en.wikipedia.org/wiki/{month_name}_{day}")
}

/// One dated event scraped off a page, as stored in `historical_events`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalEvent {
    pub event_date: String,
    pub year: i32,
    pub description: String,
    pub category: String,
    pub source_url: String,
}

/// Extracts historical events from the raw HTML of one "on this day"
/// page.
///
/// The events section starts at the `h2` carrying the `Events` anchor
/// and ends at the next `h2`, wherever that heading is nested. Every
/// list in between contributes its direct list items; items that do
/// not open with a year and a dash are skipped.
pub struct EventScraper {
    raw_html: String,
    month: u32,
    day: u32,
    source_url: String,
    events: Vec<HistoricalEvent>,
}

impl EventScraper {
    pub fn new(month: u32, day: u32, html: String) -> Self {
        Self {
            raw_html: html,
            month,
            day,
            source_url: page_url(month, day),
            events: vec![],
        }
    }

    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    pub fn run(&mut self) -> Result<(), IngestError> {
        let document = Html::parse_document(&self.raw_html);

        // One pass over headings and lists in document order bounds
        // the walk to the section between the events anchor and the
        // next heading.
        let flow_selector = Selector::parse("h2, ul")
            .map_err(|err| IngestError::Selector(err.to_string()))?;
        let year_re = Regex::new(YEAR_DASH_PATTERN)?;
        let current_year = Local::now().year();

        let mut section_found = false;
        let mut in_section = false;

        for element in document.select(&flow_selector) {
            match element.value().name() {
                "h2" => {
                    if in_section {
                        break;
                    }
                    if element.value().id() == Some("Events") {
                        section_found = true;
                        in_section = true;
                    }
                }
                "ul" if in_section => {
                    // A list nested inside another list belongs to its
                    // parent item, which has already been seen.
                    if nested_in_list(element) {
                        continue;
                    }
                    for item in direct_list_items(element) {
                        let text = item.text().collect::<String>().trim().to_string();
                        self.collect_item(&year_re, current_year, &text);
                    }
                }
                _ => {}
            }
        }

        if !section_found {
            warn!("Could not find events section on {}", self.source_url);
        }

        Ok(())
    }

    fn collect_item(&mut self, year_re: &Regex, current_year: i32, text: &str) {
        let Some(caps) = year_re.captures(text) else {
            return;
        };

        // Era-qualified items are skipped; "BC" also covers "BCE".
        if text.contains("BC") {
            return;
        }

        let Ok(year) = caps[1].parse::<i32>() else {
            return;
        };
        if !(1..=current_year).contains(&year) {
            return;
        }

        let description: String = caps[2]
            .trim()
            .chars()
            .take(MAX_DESCRIPTION_CHARS)
            .collect();

        self.events.push(HistoricalEvent {
            event_date: format!("{year:04}-{:02}-{:02}", self.month, self.day),
            year,
            description,
            category: EVENT_CATEGORY.to_string(),
            source_url: self.source_url.clone(),
        });
    }

    pub fn pretty_print(&self) {
        if self.events.is_empty() {
            warn!("No events extracted from {}", self.source_url);
            return;
        }
        info!("--- Events from {} ---", self.source_url);
        for event in &self.events {
            info!("{}: {}", event.year, event.description);
        }
        info!("--- End of events ---");
    }

    /// Insert every extracted event as one row, all inside one
    /// transaction: a failure mid-batch rolls the whole batch back and
    /// nothing is kept. Returns the number of rows inserted. An empty
    /// event set is a no-op.
    pub fn save_to_db(&self, conn: &mut Connection) -> Result<usize, IngestError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS historical_events (
                id INTEGER PRIMARY KEY,
                event_date TEXT NOT NULL,
                event_year INTEGER NOT NULL,
                event_description TEXT NOT NULL,
                event_category TEXT NOT NULL,
                source_url TEXT NOT NULL
            )",
            [],
        )?;

        if self.events.is_empty() {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        for event in &self.events {
            tx.execute(
                "INSERT INTO historical_events
                 (event_date, event_year, event_description, event_category, source_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.event_date,
                    event.year,
                    event.description,
                    event.category,
                    event.source_url,
                ],
            )?;
        }
        tx.commit()?;

        Ok(self.events.len())
    }
}

fn nested_in_list(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "ul")
}

fn direct_list_items<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
}
