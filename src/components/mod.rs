pub mod app;
pub mod ball_picker;
pub mod card_view;
pub mod confirm_modal;
pub mod dab_overlay_controls;
pub mod grid_designer;
pub mod image_uploader;
pub mod player_list;
pub mod win_modal;
