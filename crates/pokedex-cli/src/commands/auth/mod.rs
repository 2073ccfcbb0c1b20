//! Auth subcommand implementations.

mod change_password;
mod login;
mod logout;
mod refresh_token;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the session tokens
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Clear the stored session
    Logout(logout::LogoutArgs),

    /// Display the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Refresh the access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Change the account password
    ChangePassword(change_password::ChangePasswordArgs),
}

pub async fn handle(cmd: AuthCommand) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args).await,
        AuthSubcommand::Register(args) => register::run(args).await,
        AuthSubcommand::Logout(args) => logout::run(args).await,
        AuthSubcommand::Whoami(args) => whoami::run(args).await,
        AuthSubcommand::RefreshToken(args) => refresh_token::run(args).await,
        AuthSubcommand::ChangePassword(args) => change_password::run(args).await,
    }
}
