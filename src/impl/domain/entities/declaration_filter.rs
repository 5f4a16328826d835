/// Creation-date window, counted in whole Kinshasa days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Yesterday,
    /// Today and the 7 days before it.
    Week,
    /// Today and the 30 days before it.
    Month,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationFilter {
    /// Case-insensitive substring of the id, the plate or the taxpayer name.
    pub query: Option<String>,
    pub window: DateWindow,
}
