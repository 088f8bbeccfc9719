//! Input validators gating keyshares generation. Each validator is
//! independent; the CLI runs them sequentially and refuses to touch key
//! material unless all of them pass.

mod keystore_password;
mod operator_ids;
mod operator_key;
mod owner;


pub use keystore_password::{validate_password, PasswordCheck};
pub use operator_ids::{is_operator_count_valid, MAX_OPERATORS, MIN_OPERATORS};
pub use operator_key::{
    validate_operator_key, KeyRejection, OperatorKeyError, MIN_ENCODED_LEN, PEM_BEGIN, PEM_END,
};
pub use owner::Address;
