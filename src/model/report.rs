/// An item that can be rendered as a block of the text report.
pub trait ReportEntry {
    /// The name of the collection the item belongs to, used in log messages.
    const COLLECTION: &'static str;

    /// The labelled values of the item, in report order.
    fn report_fields(&self) -> Vec<(&'static str, String)>;
}
