//! Integration tests for the patrol swarm coordination core

mod auction_rounds;
mod codec_properties;
mod config_loading;
mod election;
mod role_transitions;
mod scenarios;
mod support;
