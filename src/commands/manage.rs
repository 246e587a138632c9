use super::Context;
use crate::{
    constants::MANAGE_ROUTE, error::ValidationError, models::UserPermissions, output::write_raw,
    validate,
};
use anyhow::Result;
use dialoguer::{console::Term, Input};
use std::io::{self, BufRead, Write};

/// Source of answers to the permission questions
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Free-text prompt on the terminal, falling back to plain stdin lines when
/// stderr is not a tty (piped answers, redirected output)
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        if !Term::stderr().is_term() {
            return LinePrompt::new(io::stdin().lock(), io::stderr()).ask(question);
        }
        let answer = Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// Writes each question to `out` and reads one answer line from `input`
///
/// End of input answers with an empty string.
pub struct LinePrompt<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, out: W) -> Self {
        LinePrompt { input, out }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.out, "{question} ")?;
        self.out.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// `y` or `yes`, any case, surrounding whitespace ignored
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn ask_flag<P: Prompt, W: Write>(prompt: &mut P, out: &mut W, permission: &str) -> Result<bool> {
    let answer = prompt.ask(&format!("Change permission for {permission} to true? (y/n)"))?;
    let granted = is_yes(&answer);
    if granted {
        writeln!(out, "Permission for {permission} changed.")?;
    } else {
        writeln!(out, "Permission for {permission} not changed.")?;
    }
    Ok(granted)
}

/// Ask for each capability in turn; unanswered ones stay false
pub fn collect_permissions<P: Prompt, W: Write>(
    prompt: &mut P,
    out: &mut W,
    user_id: i64,
) -> Result<UserPermissions> {
    let can_login = ask_flag(prompt, out, "CanLogin")?;
    let can_upload = ask_flag(prompt, out, "CanUpload")?;
    let can_search = ask_flag(prompt, out, "CanSearch")?;
    let can_manage = ask_flag(prompt, out, "CanManage")?;
    Ok(UserPermissions {
        user_id,
        can_login,
        can_search,
        can_upload,
        can_manage,
    })
}

pub async fn run<W: Write, P: Prompt>(
    ctx: &Context<'_>,
    out: &mut W,
    uid: &str,
    prompt: &mut P,
) -> Result<()> {
    let uid = validate::number(uid)?;
    let user_id: i64 = uid
        .parse()
        .map_err(|_| ValidationError::Number(uid.to_string()))?;
    let token = ctx.token().await?;
    let perms = collect_permissions(prompt, out, user_id)?;
    let body = ctx
        .transport
        .post_json(MANAGE_ROUTE, &perms, Some(token.as_str()))
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
