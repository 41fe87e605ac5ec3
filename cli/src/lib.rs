// SPDX-License-Identifier: MIT OR Apache-2.0

//! chessgrid CLI - line-oriented front end for the selection core

pub mod commands;
pub mod render;
