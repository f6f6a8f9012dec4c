//! Data builders behind the insights charts that close the story.
//!
//! Everything here is a pure function of the parsed datasets; rendering the
//! charts is left to the page.

pub mod analysis;
pub mod confederation;
pub mod report;

pub use analysis::champions::{ChampionCount, Champions};
pub use analysis::flows::{FlowGraph, FlowLink, FlowNode, Flows, SortOrder};
pub use analysis::network::{Rivalries, RivalryLink, RivalryNetwork};
pub use analysis::teams::{TeamRecord, Teams};
pub use confederation::{Confederation, RegionFilter};
pub use report::{InsightsReport, ReportOptions};
