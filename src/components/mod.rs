pub mod action_bar;
pub mod app;
pub mod error_panel;
pub mod feed_view;
pub mod info_panel;
pub mod login_view;
pub mod progress_bar;
pub mod seek_badge;
pub mod speed_badge;
pub mod video_card;
