//! # Selection Cascade
//!
//! `transition()` is the pure rule set; `SelectionMachine` wraps it with
//! the current state and a bounded log of applied transitions.
//!
//! ## Rules
//!
//! | Event | Precondition | Result |
//! |---|---|---|
//! | `SetZone(z)` | `z` is a known zone | `ZoneChosen{z}` |
//! | `MapClicked(code)` | zone chosen; code resolves to a country of that zone | `CountryChosen` |
//! | `SetSector(s)` | country chosen; `s` has records for that country | `SectorChosen` |
//! | `Reset` | none | `Empty` |
//!
//! A failed precondition leaves the state untouched, including the last
//! map click code.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use geodash_core::{Catalog, TerritoryCode};
use serde::{Deserialize, Serialize};

/// Maximum number of transition records a machine keeps.
pub const HISTORY_LIMIT: usize = 64;

// ─── Levels ──────────────────────────────────────────────────────────

/// How far down the cascade a selection has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionLevel {
    Empty,
    ZoneChosen,
    CountryChosen,
    SectorChosen,
}

impl fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "EMPTY",
            Self::ZoneChosen => "ZONE_CHOSEN",
            Self::CountryChosen => "COUNTRY_CHOSEN",
            Self::SectorChosen => "SECTOR_CHOSEN",
        };
        f.write_str(s)
    }
}

// ─── Selection ───────────────────────────────────────────────────────

/// The current selector values of one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    ZoneChosen {
        zone: String,
    },
    CountryChosen {
        zone: String,
        country: String,
        /// Code of the map click that chose `country`.
        territory_code: TerritoryCode,
    },
    SectorChosen {
        zone: String,
        country: String,
        territory_code: TerritoryCode,
        sector: String,
    },
}

impl Selection {
    pub fn level(&self) -> SelectionLevel {
        match self {
            Self::Empty => SelectionLevel::Empty,
            Self::ZoneChosen { .. } => SelectionLevel::ZoneChosen,
            Self::CountryChosen { .. } => SelectionLevel::CountryChosen,
            Self::SectorChosen { .. } => SelectionLevel::SectorChosen,
        }
    }

    pub fn zone(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::ZoneChosen { zone }
            | Self::CountryChosen { zone, .. }
            | Self::SectorChosen { zone, .. } => Some(zone.as_str()),
        }
    }

    pub fn country(&self) -> Option<&str> {
        match self {
            Self::CountryChosen { country, .. } | Self::SectorChosen { country, .. } => {
                Some(country.as_str())
            }
            _ => None,
        }
    }

    pub fn sector(&self) -> Option<&str> {
        match self {
            Self::SectorChosen { sector, .. } => Some(sector.as_str()),
            _ => None,
        }
    }

    /// Most recent resolved map click, while a country is chosen.
    pub fn last_map_click_code(&self) -> Option<&TerritoryCode> {
        match self {
            Self::CountryChosen { territory_code, .. }
            | Self::SectorChosen { territory_code, .. } => Some(territory_code),
            _ => None,
        }
    }

    /// Widgets that exist on screen at this level.
    pub fn widgets(&self) -> Vec<Widget> {
        let level = self.level();
        let mut widgets = vec![Widget::ZoneSelector];
        if level >= SelectionLevel::ZoneChosen {
            widgets.push(Widget::Map);
        }
        if level >= SelectionLevel::CountryChosen {
            widgets.push(Widget::SectorSelector);
        }
        if level == SelectionLevel::SectorChosen {
            widgets.extend([
                Widget::StockPriceChart,
                Widget::MarketCapChart,
                Widget::CompanyTable,
                Widget::Download,
            ]);
        }
        widgets
    }

    /// Flat wire representation.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            state: self.level(),
            zone: self.zone().map(str::to_string),
            country: self.country().map(str::to_string),
            sector: self.sector().map(str::to_string),
            last_map_click_code: self.last_map_click_code().cloned(),
        }
    }
}

/// Flat, serializable view of a [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub state: SelectionLevel,
    pub zone: Option<String>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub last_map_click_code: Option<TerritoryCode>,
}

/// A renderable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    ZoneSelector,
    Map,
    SectorSelector,
    StockPriceChart,
    MarketCapChart,
    CompanyTable,
    Download,
}

// ─── Events & Outcomes ───────────────────────────────────────────────

/// A selector change coming from the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    SetZone { zone: String },
    MapClicked { code: String },
    SetSector { sector: String },
    Reset,
}

impl SelectionEvent {
    /// Short event name for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetZone { .. } => "set_zone",
            Self::MapClicked { .. } => "map_clicked",
            Self::SetSector { .. } => "set_sector",
            Self::Reset => "reset",
        }
    }
}

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// `SetZone` named a zone the taxonomy does not know.
    UnknownZone,
    /// `MapClicked` arrived before any zone was chosen.
    NoZone,
    /// The clicked code maps to no taxonomy country.
    UnresolvedTerritory,
    /// The clicked country belongs to a different zone.
    CountryOutsideZone,
    /// `SetSector` arrived before any country was chosen.
    NoCountry,
    /// The chosen country has no records in that sector.
    SectorUnavailable,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnknownZone => "unknown_zone",
            Self::NoZone => "no_zone",
            Self::UnresolvedTerritory => "unresolved_territory",
            Self::CountryOutsideZone => "country_outside_zone",
            Self::NoCountry => "no_country",
            Self::SectorUnavailable => "sector_unavailable",
        };
        f.write_str(s)
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Applied {
        from: SelectionLevel,
        to: SelectionLevel,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Metrics label: `applied` or the ignore reason.
    pub fn label(&self) -> String {
        match self {
            Self::Applied { .. } => "applied".to_string(),
            Self::Ignored { reason } => reason.to_string(),
        }
    }
}

// ─── Transition Function ─────────────────────────────────────────────

/// Compute the selection that follows `event`, or why it does not apply.
pub fn transition(
    current: &Selection,
    catalog: &Catalog,
    event: &SelectionEvent,
) -> Result<Selection, IgnoreReason> {
    match event {
        SelectionEvent::SetZone { zone } => {
            if !catalog.taxonomy().contains_zone(zone) {
                return Err(IgnoreReason::UnknownZone);
            }
            Ok(Selection::ZoneChosen { zone: zone.clone() })
        }

        SelectionEvent::MapClicked { code } => {
            let zone = current.zone().ok_or(IgnoreReason::NoZone)?;
            let country = catalog
                .geo()
                .resolve_country_name(code)
                .ok_or(IgnoreReason::UnresolvedTerritory)?;
            let territory_code = catalog
                .geo()
                .resolve_territory_code(country)
                .ok_or(IgnoreReason::UnresolvedTerritory)?;
            if catalog.taxonomy().zone_of(country) != Some(zone) {
                return Err(IgnoreReason::CountryOutsideZone);
            }
            Ok(Selection::CountryChosen {
                zone: zone.to_string(),
                country: country.to_string(),
                territory_code,
            })
        }

        SelectionEvent::SetSector { sector } => {
            let (zone, country, territory_code) = match current {
                Selection::CountryChosen {
                    zone,
                    country,
                    territory_code,
                }
                | Selection::SectorChosen {
                    zone,
                    country,
                    territory_code,
                    ..
                } => (zone, country, territory_code),
                _ => return Err(IgnoreReason::NoCountry),
            };
            if !catalog.facts().has_sector(country, sector) {
                return Err(IgnoreReason::SectorUnavailable);
            }
            Ok(Selection::SectorChosen {
                zone: zone.clone(),
                country: country.clone(),
                territory_code: territory_code.clone(),
                sector: sector.clone(),
            })
        }

        SelectionEvent::Reset => Ok(Selection::Empty),
    }
}

// ─── Machine ─────────────────────────────────────────────────────────

/// Record of an applied transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: SelectionLevel,
    pub to: SelectionLevel,
    /// Event kind, as returned by [`SelectionEvent::kind`].
    pub event: String,
    pub timestamp: DateTime<Utc>,
}

/// One session's selection plus its recent transition log.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
    history: VecDeque<TransitionRecord>,
}

impl SelectionMachine {
    /// A machine in the `Empty` state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Applied transitions, oldest first. At most [`HISTORY_LIMIT`] entries.
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    /// Apply `event`. Ignored events leave the machine untouched.
    pub fn apply(&mut self, catalog: &Catalog, event: &SelectionEvent) -> Outcome {
        match transition(&self.selection, catalog, event) {
            Ok(next) => {
                let from = self.selection.level();
                let to = next.level();
                self.selection = next;
                if self.history.len() == HISTORY_LIMIT {
                    self.history.pop_front();
                }
                self.history.push_back(TransitionRecord {
                    from,
                    to,
                    event: event.kind().to_string(),
                    timestamp: Utc::now(),
                });
                Outcome::Applied { from, to }
            }
            Err(reason) => Outcome::Ignored { reason },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
