//! Account registration and payment method commands.
//!
//! Card details never pass through here: `payment save` forwards a
//! payment-method id that the payment provider has already issued.

use clap::Subcommand;
use lockin_core::{Config, GoalsClient, StaticToken, UserRegistration};

use super::goals::print_response;
use super::{block_on, client};

#[derive(Subcommand)]
pub enum AccountAction {
    /// Register a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Attach a tokenized payment method to the account
    SavePayment {
        /// Payment-method id from the payment provider
        #[arg(long)]
        method_id: String,
    },
    /// Verify the saved card
    VerifyCard,
}

pub fn run(action: AccountAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        AccountAction::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let user = UserRegistration {
                email,
                password,
                first_name,
                last_name,
            };
            // Registration happens before any token exists.
            let client = GoalsClient::from_config(&config, StaticToken::none())?;
            let resp = block_on(client.register_user(&user))??;
            print_response("Registered", &resp);
        }
        AccountAction::SavePayment { method_id } => {
            let client = client(&config)?;
            let resp = block_on(client.save_payment_method(&method_id))??;
            print_response("Payment method saved", &resp);
        }
        AccountAction::VerifyCard => {
            let client = client(&config)?;
            let resp = block_on(client.verify_card())??;
            print_response("Card verified", &resp);
        }
    }
    Ok(())
}
