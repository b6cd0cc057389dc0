//! Board overview handlers.

use bbs_core::models::UserId;
use bbs_core::store::Store;
use bbs_ui::render;
use chrono::Utc;

pub fn categories(store: &Store) {
    println!("{}", render::categories(store).join("\n"));
}

pub fn stats(store: &Store) {
    println!("{}", render::stats(store).join("\n"));
}

pub fn user(store: &Store, id: UserId) {
    println!("{}", render::profile(store, id, None, Utc::now()).join("\n"));
}
