//! Substitute one payload into a template.

use anyhow::Result;
use clap::Args;

use crate::templating::{RowPayload, Template};

/// Print `--template` with the tokens of `--payload` substituted.
///
/// Unlike `render`, failures are reported as errors and there is no
/// `Title` requirement.
#[derive(Args, Debug)]
pub struct SubstituteCommand {
    /// URL template containing {name} tokens
    #[arg(long)]
    template: String,

    /// JSON object supplying token values
    #[arg(long)]
    payload: String,
}

impl SubstituteCommand {
    /// Execute the command, printing the result to stdout.
    pub fn execute(self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let payload = RowPayload::parse(&self.payload)?;
        Ok(Template::new(self.template.as_str()).substitute(&payload)?)
    }
}
