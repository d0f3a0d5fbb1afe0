pub mod color;
pub mod confirm_delete;
pub mod tabs;
pub mod contact_list;
pub mod gift_list;
pub mod upcoming;
pub mod editor;
pub mod item_view;
pub mod status_bar;
pub mod help;
pub mod setup;
pub mod form;
