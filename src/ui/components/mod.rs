pub mod month_grid;
pub mod overlay;
pub mod table;
