pub mod status_card;
