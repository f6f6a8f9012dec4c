use formats::{Geometry, TournamentFile, VenueTable, read_match_rows};
use foundation::math::GeoPoint;
use scene::regions::RegionRegistry;

use crate::config::StoryConfig;
use crate::steps::build_narrative_steps;
use crate::tournament::build_tournaments;
use crate::transition::Story;

pub(crate) const CUPS: &str = r#"{"cups": [
  {"year": 1930, "host": "Uruguay", "hostFlag": "uy", "audio": "audio/1930.mp3",
   "mascot": "mascots/1930.png",
   "champion": {"name": "Uruguay", "flag": "uy"},
   "phaseOrder": ["group stage", "final"],
   "historySections": [
     {"key": "overview", "title": "First cup", "text": "Thirteen teams."},
     {"key": "final", "title": "The final", "text": "4-2."}
   ],
   "venues": {"Estadio Centenario": {"lat": -34.89, "lon": -56.15}}},
  {"year": 1934, "host": "Italy", "hostFlag": "it", "audio": "audio/1934.mp3",
   "champion": {"name": "Italy", "flag": "it"}},
  {"year": 2002, "host": "Korea Republic", "coHost": "Japan", "hostFlag": "kr",
   "coHostFlag": "jp", "audio": "audio/2002.mp3",
   "champion": {"name": "Brazil", "flag": "br"},
   "venues": {"Seoul World Cup Stadium": {"lat": 37.57, "lon": 126.9},
              "International Stadium Yokohama": {"lat": 35.51, "lon": 139.6}}}
]}"#;

pub(crate) const MATCHES: &str = "\
Tournament Id,Stage Name,Match Date,Match Time,Home Team Name,Away Team Name,Home Team Code,Away Team Code,Home Team Score,Away Team Score,Result,Stadium Name,City Name
WC-1930,final,7/30/1930,14:15,Uruguay,Argentina,URY,ARG,4,2,home team win,Estadio Centenario,Montevideo
WC-1930,group 1,7/13/1930,15:00,France,Mexico,FRA,MEX,4,1,home team win,Estadio Centenario,Montevideo
WC-1934,final,6/10/1934,17:30,Italy,Czechoslovakia,ITA,TCH,2,1,home team win,Stadio Nazionale PNF,Rome
WC-2002,group stage,5/31/2002,20:30,France,Senegal,FRA,SEN,0,1,away team win,Seoul World Cup Stadium,Seoul
WC-2002,final,6/30/2002,20:00,Germany,Brazil,DEU,BRA,0,2,away team win,International Stadium Yokohama,Yokohama
";

pub(crate) fn square(lon0: f64, lat0: f64) -> Geometry {
    Geometry::Polygon(vec![vec![
        GeoPoint::new(lon0, lat0),
        GeoPoint::new(lon0 + 5.0, lat0),
        GeoPoint::new(lon0 + 5.0, lat0 + 5.0),
        GeoPoint::new(lon0, lat0 + 5.0),
        GeoPoint::new(lon0, lat0),
    ]])
}

pub(crate) fn registry() -> RegionRegistry {
    let mut reg = RegionRegistry::new();
    reg.push(vec!["Uruguay".into()], square(-58.0, -35.0));
    reg.push(vec!["Italy".into()], square(8.0, 40.0));
    reg.push(vec!["Korea Republic".into()], square(125.0, 34.0));
    reg.push(vec!["Japan".into()], square(136.0, 33.0));
    reg
}

/// Steps of the fixture, by index:
///
/// ```text
///  0 intro
///  1 world 1930   2 worldcup  3 split  4-5 match  6 champion  7 facts
///  8 world 1934   9 worldcup 10 split 11   match 12 champion 13 facts
/// 14 world 2002  15 worldcup 16 split 17-18 match 19 champion 20 facts
/// 21 world       22 insights-intro 23-25 charts 26 conclusion
/// ```
pub(crate) fn story_with(registry: RegionRegistry) -> Story {
    let config = StoryConfig::default();
    let file = TournamentFile::from_json_str(CUPS).expect("cups");
    let rows = read_match_rows(MATCHES).expect("rows");
    let tournaments = build_tournaments(&file, &rows, &VenueTable::new(), &config);
    let steps = build_narrative_steps(&tournaments);
    Story::new(config, tournaments, registry, steps)
}

pub(crate) fn story() -> Story {
    story_with(registry())
}
