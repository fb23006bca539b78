//! Bounded activity display

pub mod view;

pub use view::ActivityView;
