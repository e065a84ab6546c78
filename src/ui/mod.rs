pub mod explorer;
pub mod intro;
pub mod map;
pub mod panels;
pub mod plot;
pub mod table;
