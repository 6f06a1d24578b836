pub mod controls;
pub mod force_graph;
pub mod search_panel;
pub mod source_view;
