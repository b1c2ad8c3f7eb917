// src/discord/mod.rs
mod client;
mod commands;
mod events;
pub use client::DiscordClient;
