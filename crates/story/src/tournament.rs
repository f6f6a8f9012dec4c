//! Tournament model and match derivation from the raw datasets.

use formats::{MatchRow, TournamentFile, TournamentRecord, Venue, VenueTable};
use foundation::math::GeoPoint;
use tracing::warn;

use crate::config::{Labels, StoryConfig};
use crate::error::StoryError;
use crate::flags::flag_code_for_team;
use crate::normalize::{HistoryKey, Stage, normalize_stage, parse_mdy_to_iso, parse_time_hhmm};

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSide {
    pub display_name: String,
    pub flag_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub stage: Stage,
    pub history_key: HistoryKey,
    pub display_phase_title: String,
    /// `YYYY-MM-DD`, or empty when the source date was unusable.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    pub city: String,
    pub stadium: String,
    pub home: TeamSide,
    pub away: TeamSide,
    pub home_goals: u32,
    pub away_goals: u32,
    pub score: String,
    pub result_text: String,
    pub location: Option<GeoPoint>,
}

impl Match {
    fn chrono_key(&self) -> String {
        format!("{}T{}", self.date, self.time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySection {
    pub key: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Champion {
    pub name: String,
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub year: u16,
    pub host: String,
    pub co_host: Option<String>,
    pub host_flag: String,
    pub co_host_flag: Option<String>,
    pub mascot: Option<String>,
    pub audio: Option<String>,
    pub champion: Option<Champion>,
    pub history_sections: Vec<HistorySection>,
    pub venues: VenueTable,
    pub phase_order: Vec<String>,
    /// Ordered by phase, then date and time.
    pub matches: Vec<Match>,
}

impl Tournament {
    /// Model for one record, with the global venue table merged over its own
    /// venues. Matches are left empty.
    pub fn from_record(record: &TournamentRecord, global_venues: &VenueTable) -> Self {
        let mut venues = record.venues.clone();
        venues.merge_from(global_venues);
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            year: record.year,
            host: record.host.trim().to_string(),
            co_host: record.co_host_name().map(str::to_string),
            host_flag: record.host_flag.trim().to_string(),
            co_host_flag: non_blank(&record.co_host_flag),
            mascot: non_blank(&record.mascot),
            audio: non_blank(&record.audio),
            champion: record.champion.as_ref().map(|c| Champion {
                name: c.name.trim().to_string(),
                flag: c.flag.trim().to_string(),
            }),
            history_sections: record
                .history_sections
                .iter()
                .map(|s| HistorySection {
                    key: s.key.trim().to_string(),
                    title: s.title.clone(),
                    text: s.text.clone(),
                })
                .collect(),
            venues,
            phase_order: record.phase_order.clone(),
            matches: Vec::new(),
        }
    }

    pub fn tournament_id(&self) -> String {
        format!("WC-{}", self.year)
    }

    /// Host flag, then the co-host's (falling back to the host flag).
    pub fn flags(&self) -> Vec<String> {
        let mut out = vec![self.host_flag.clone()];
        if self.co_host.is_some() {
            out.push(
                self.co_host_flag
                    .clone()
                    .unwrap_or_else(|| self.host_flag.clone()),
            );
        }
        out.retain(|f| !f.is_empty());
        out
    }

    pub fn title(&self, labels: &Labels) -> String {
        labels.tournament_title(&self.host, self.co_host.as_deref(), self.year)
    }

    /// The section for `key`, else the first section, else an empty one.
    pub fn history_section(&self, key: HistoryKey, labels: &Labels) -> HistorySection {
        self.history_sections
            .iter()
            .find(|s| s.key == key.as_str())
            .or_else(|| self.history_sections.first())
            .cloned()
            .unwrap_or_else(|| HistorySection {
                key: key.as_str().to_string(),
                title: labels.history_fallback_title.clone(),
                text: String::new(),
            })
    }

    pub fn match_at(&self, index: usize) -> Result<&Match, StoryError> {
        self.matches.get(index).ok_or(StoryError::MissingStep {
            index,
            len: self.matches.len(),
        })
    }

    fn phase_index(&self, stage: &Stage) -> usize {
        let label = stage.label();
        self.phase_order
            .iter()
            .position(|p| p.trim().to_lowercase() == label)
            .unwrap_or(usize::MAX)
    }
}

/// Stadium, then the default venue key, then the first venue listed.
pub fn resolve_venue(venues: &VenueTable, stadium: &str, default_key: &str) -> Option<Venue> {
    let stadium = stadium.trim();
    if !stadium.is_empty() {
        if let Some(v) = venues.get(stadium) {
            return Some(v);
        }
    }
    venues.get(default_key).or_else(|| venues.first())
}

/// Derive the ordered matches of `tournament` from the raw CSV rows.
///
/// Ordering contract:
/// - rows are first ordered by date and time; the earliest becomes the
///   opening match when `mark_opening_match` is set;
/// - the result is then stably ordered by `phase_order` position (stages
///   not listed go last) and by date and time within a phase.
pub fn build_matches_for_tournament(
    tournament: &Tournament,
    rows: &[MatchRow],
    config: &StoryConfig,
) -> Vec<Match> {
    let id = tournament.tournament_id();
    let labels = &config.labels;

    let mut matches: Vec<Match> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.tournament_id.trim() == id)
        .map(|(row, r)| {
            let (m, problems) = derive_match(r, tournament, config);
            for problem in problems {
                let e = StoryError::MalformedRow {
                    row,
                    field: problem.0,
                    value: problem.1,
                };
                warn!(target: "story::data", year = tournament.year, "{e}");
            }
            m
        })
        .collect();

    matches.sort_by_key(Match::chrono_key);
    if config.mark_opening_match {
        if let Some(first) = matches.first_mut() {
            first.display_phase_title = labels.opening_match.clone();
        }
    }
    matches.sort_by_cached_key(|m| (tournament.phase_index(&m.stage), m.chrono_key()));
    matches
}

fn derive_match(
    r: &MatchRow,
    tournament: &Tournament,
    config: &StoryConfig,
) -> (Match, Vec<(&'static str, String)>) {
    let labels = &config.labels;
    let mut problems = Vec::new();

    let stage = normalize_stage(&r.stage_name);
    let date = parse_mdy_to_iso(&r.match_date).unwrap_or_else(|| {
        problems.push(("Match Date", r.match_date.clone()));
        String::new()
    });
    let time = parse_time_hhmm(&r.match_time).unwrap_or_else(|| {
        problems.push(("Match Time", r.match_time.clone()));
        "00:00".to_string()
    });
    for (field, raw) in [
        ("Home Team Score", &r.home_team_score),
        ("Away Team Score", &r.away_team_score),
    ] {
        if !raw.trim().is_empty() && raw.trim().parse::<f64>().is_err() {
            problems.push((field, raw.clone()));
        }
    }

    let home_name = labels.country(r.home_team_name.trim()).to_string();
    let away_name = labels.country(r.away_team_name.trim()).to_string();
    let (home_goals, away_goals) = (r.home_goals(), r.away_goals());

    let result = r.result.to_lowercase();
    let result_text = if result.contains("home") {
        labels.win(&home_name)
    } else if result.contains("away") {
        labels.win(&away_name)
    } else {
        labels.draw.clone()
    };

    let display_phase_title = match labels.stage_titles.get(stage.label()) {
        Some(t) => t.clone(),
        None => match stage {
            Stage::Unknown | Stage::Other(_) => labels.unknown_stage.clone(),
            _ => stage.label().to_string(),
        },
    };

    let location = resolve_venue(&tournament.venues, &r.stadium_name, &config.default_venue_key)
        .map(|v| GeoPoint::new(v.lon, v.lat));

    let m = Match {
        history_key: stage.history_key(),
        display_phase_title,
        date,
        time,
        city: r.city_name.trim().to_string(),
        stadium: r.stadium_name.trim().to_string(),
        home: TeamSide {
            display_name: home_name,
            flag_code: flag_code_for_team(&r.home_team_code),
        },
        away: TeamSide {
            display_name: away_name,
            flag_code: flag_code_for_team(&r.away_team_code),
        },
        home_goals,
        away_goals,
        score: format!("{home_goals} - {away_goals}"),
        result_text,
        location,
        stage,
    };
    (m, problems)
}

/// Every tournament of the file with venues merged and matches derived.
pub fn build_tournaments(
    file: &TournamentFile,
    rows: &[MatchRow],
    global_venues: &VenueTable,
    config: &StoryConfig,
) -> Vec<Tournament> {
    file.cups
        .iter()
        .map(|record| {
            let mut t = Tournament::from_record(record, global_venues);
            t.matches = build_matches_for_tournament(&t, rows, config);
            t
        })
        .collect()
}
