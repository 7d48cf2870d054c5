// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format handlers: gemtext in, LaTeX out

pub mod gemtext;
pub mod latex;

pub use gemtext::{Fragments, GemtextParser};
pub use latex::LatexRenderer;
