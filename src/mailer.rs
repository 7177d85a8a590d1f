//! Customer outcome notices.
//!
//! The pipeline tells the customer how their checkout ended; actual
//! delivery (SMTP, push, whatever) is a collaborator concern behind
//! [`CustomerMailer`]. A delivery failure after the order has committed is
//! logged and never rolls the order back.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::ledger::{Customer, OrderRecord, TransactionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    BufferPoisoned,
    /// The delivery transport refused or timed out.
    Transport(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::BufferPoisoned => write!(f, "mail buffer poisoned"),
            MailError::Transport(msg) => write!(f, "mail transport failed: {}", msg),
        }
    }
}

impl std::error::Error for MailError {}

/// Trait for sending checkout outcome notices to the customer.
pub trait CustomerMailer: Send + Sync {
    /// Tell the customer the transaction did not go through. No order was
    /// placed; the declined and gateway-failure notices read differently.
    fn send_failure_notice(
        &self,
        customer: &Customer,
        status: TransactionStatus,
    ) -> Result<(), MailError>;

    /// Confirm a placed order with its full details.
    fn send_success_notice(&self, customer: &Customer, order: &OrderRecord)
        -> Result<(), MailError>;
}

fn or_not_provided(value: &str) -> &str {
    if value.is_empty() {
        "Not provided"
    } else {
        value
    }
}

/// A mailer that renders notices to stdout or a shared buffer.
///
/// The buffered form is for tests and single-process demos; a real
/// deployment swaps in a transport-backed implementation.
pub struct LogMailer {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogMailer {
    pub fn new() -> Self {
        LogMailer { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogMailer {
            buffer: Some(buffer),
        }
    }

    fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let rendered = format!("[MAIL] to: {}\nsubject: {}\n{}", to, subject, body);
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer.lock().map_err(|_| MailError::BufferPoisoned)?;
            buffer.push(rendered);
        } else {
            println!("{}", rendered);
        }
        Ok(())
    }
}

impl CustomerMailer for LogMailer {
    fn send_failure_notice(
        &self,
        customer: &Customer,
        status: TransactionStatus,
    ) -> Result<(), MailError> {
        let subject = format!("Transaction {} - Order Not Processed", status);
        let reason = if status == TransactionStatus::Declined {
            "Your payment method was declined. If this was an error, you may retry the payment. \
             If any amount was deducted, please contact customer support."
        } else {
            "The payment did not go through due to a gateway error. If any amount was deducted, \
             please contact customer support."
        };
        let body = format!(
            "Hello {},\n\n{}\n\nThank you for choosing D-Comm.",
            or_not_provided(&customer.full_name),
            reason
        );
        self.deliver(&customer.email, &subject, &body)
    }

    fn send_success_notice(
        &self,
        customer: &Customer,
        order: &OrderRecord,
    ) -> Result<(), MailError> {
        let subject = format!("Order Confirmation - Order ID: {}", order.order_id);
        let body = format!(
            "Hello {},\n\n\
             Thank you for shopping with D-Comm! Your order has been successfully placed.\n\n\
             Order Number: {}\n\n\
             Product Details:\n\
             - Product Name: {}\n\
             - Color: {}\n\
             - Size: {}\n\
             - Quantity: {}\n\
             - Unit Price: ${}\n\
             - Total Price: ${}\n\n\
             Customer Information:\n\
             - Name: {}\n\
             - Email: {}\n\
             - Phone Number: {}\n\
             - Address: {}\n\
             - Zip Code: {}\n\n\
             Transaction Status: {}\n\n\
             Your order is being prepared for dispatch. You will receive tracking details once \
             it ships.\n\n\
             Best regards,\nD-Comm Support Team",
            or_not_provided(&customer.full_name),
            order.order_id,
            order.product_name,
            order.color,
            order.size,
            order.quantity,
            order.unit_price,
            order.total_price,
            or_not_provided(&customer.full_name),
            customer.email,
            or_not_provided(&customer.phone),
            or_not_provided(&customer.address),
            or_not_provided(&customer.city_state_zip),
            order.transaction_status,
        );
        self.deliver(&customer.email, &subject, &body)
    }
}
