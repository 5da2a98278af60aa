pub mod detect_view;
pub mod sidebar;
pub mod theme;
