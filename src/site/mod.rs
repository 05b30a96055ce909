//! Site generation: one render pass over the model, then the files each
//! display view needs.

mod output;
mod render;
mod summary;
mod toc;

pub use output::{output_file, write_view, WriteSummary};
pub use render::{RenderPass, SiteView, ViewFiles};
pub use summary::{
    class_index, package_index, source_link, ClassIndex, ClasslikeDetail, Hierarchy,
    InheritedGroup, MemberSummary, PackageIndex, PackageSummary, ParameterSummary, Summarizer,
    SummaryOptions,
};
pub use toc::{table_of_contents, trim_package_prefix, TableOfContents, TocEntry};
