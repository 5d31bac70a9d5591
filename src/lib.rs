//! Honeypot Agent - Scam-Baiting Conversational Backend
//!
//! This crate receives messages from suspected fraud actors, tracks each
//! conversation as a session, extracts actionable intelligence (payment
//! identifiers, phishing links, phone numbers, suspicious vocabulary), and
//! replies in a persona designed to keep the counterpart engaged.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
