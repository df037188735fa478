//! Transactional email via AWS SES

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use rust_decimal::Decimal;

use crate::db::orders::OrderItemDetail;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Handle for outbound notification email
#[derive(Debug, Clone)]
pub struct Mailer {
    ses: SesClient,
    from: String,
}

impl Mailer {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }

    async fn send(&self, to: &str, subject: &str, body_text: String) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;
        Ok(())
    }

    /// "Order placed, awaiting payment" notification
    pub async fn send_order_placed(
        &self,
        to: &str,
        order_id: i64,
        total: Decimal,
    ) -> Result<(), BoxError> {
        let body_text = format!(
            "Thank you for your order!\n\n\
             Order #{order_id} has been placed and is awaiting payment.\n\
             Total: ${total}\n\n\
             You will receive a confirmation once the payment completes."
        );
        self.send(to, "Your Bookhub order has been placed", body_text)
            .await?;

        tracing::info!(to = to, order_id = order_id, "Order placed email sent");
        Ok(())
    }

    /// Payment receipt listing the purchased items
    pub async fn send_payment_confirmed(
        &self,
        to: &str,
        order_id: i64,
        items: &[OrderItemDetail],
        total: Decimal,
    ) -> Result<(), BoxError> {
        let mut lines = String::new();
        for item in items {
            lines.push_str(&format!(
                "  {} x{} at ${}\n",
                item.title, item.quantity, item.price
            ));
        }

        let body_text = format!(
            "Your payment for order #{order_id} has been received.\n\n\
             Items:\n{lines}\n\
             Total paid: ${total}\n\n\
             Happy reading!"
        );
        self.send(to, "Your Bookhub payment is confirmed", body_text)
            .await?;

        tracing::info!(to = to, order_id = order_id, "Payment confirmed email sent");
        Ok(())
    }

    /// Payment failed or checkout expired notice
    pub async fn send_payment_failed(&self, to: &str, order_id: i64) -> Result<(), BoxError> {
        let body_text = format!(
            "The payment for order #{order_id} could not be completed and the \
             order has been cancelled.\n\n\
             No charge was made. You can place a new order at any time."
        );
        self.send(to, "Your Bookhub payment failed", body_text)
            .await?;

        tracing::info!(to = to, order_id = order_id, "Payment failed email sent");
        Ok(())
    }
}
