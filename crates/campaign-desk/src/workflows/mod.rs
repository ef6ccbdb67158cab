pub mod campaigns;
pub mod roster;
