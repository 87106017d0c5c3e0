//! Unit and behavioural tests for the language client.

mod support;
