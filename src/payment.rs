//! Payment confirmation after the checkout page redirects back.
//!
//! The checkout provider appends `paymentKey`, `orderId` and `amount` (plus
//! optional order details) to the return URL. We confirm the payment with the
//! backend and then record it, whether or not the confirmation succeeded.
use chrono::{SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ApiClient, ApiError};
use crate::nav::{web_link, LinkError};

pub const DEFAULT_ORDER_NAME: &str = "Membership";
pub const DEFAULT_PAYMENT_METHOD: &str = "Toss Payments";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    user_id: &'a str,
    product_id: &'a str,
    amount: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody<'a> {
    payment_key: &'a str,
    order_id: &'a str,
    amount: u64,
}

/// Body of `POST /payments/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub order_id: String,
    pub user_id: String,
    pub product_id: String,
    pub order_name: String,
    pub amount: u64,
    pub payment_method: String,
    pub approved_at: String,
}

/// Client for the `/payments` endpoints.
#[derive(Debug, Clone)]
pub struct PaymentApi {
    api: ApiClient,
}

impl PaymentApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Start a payment; the response shape is owned by the backend.
    pub async fn create_payment(
        &self,
        user_id: &str,
        product_id: &str,
        amount: u64,
    ) -> Result<serde_json::Value, ApiError> {
        self.api
            .post_json(
                "payments/create",
                &CreateBody {
                    user_id,
                    product_id,
                    amount,
                },
            )
            .await
    }

    pub async fn save_payment_info(&self, record: &PaymentRecord) -> Result<(), ApiError> {
        self.api.post_unit("payments/save", record).await
    }

    /// Ask the backend to confirm the payment. A non-2xx answer is reported
    /// as `Ok(false)` after logging the response body.
    pub async fn confirm(
        &self,
        payment_key: &SecretString,
        order_id: &str,
        amount: u64,
    ) -> Result<bool, ApiError> {
        tracing::info!(order_id, amount, "Confirming payment");
        let body = ConfirmBody {
            payment_key: payment_key.expose_secret(),
            order_id,
            amount,
        };
        let (status, text) = self.api.post_raw("payments/confirm", &body).await?;
        if (200..300).contains(&status) {
            return Ok(true);
        }
        tracing::error!(order_id, status, body = %text, "Payment confirmation rejected");
        Ok(false)
    }
}

/// Parameters carried on the checkout return URL.
#[derive(Debug, Default)]
pub struct PaymentParams {
    pub payment_key: Option<SecretString>,
    pub order_id: Option<String>,
    pub amount: Option<String>,
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub order_name: Option<String>,
    pub payment_method: Option<String>,
}

impl PaymentParams {
    /// Parse a query string, with or without the leading `?`, or a full URL.
    /// Empty values count as absent.
    pub fn from_query(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, q)) => q,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let value = value.into_owned();
            match key.as_ref() {
                "paymentKey" => params.payment_key = Some(SecretString::from(value)),
                "orderId" => params.order_id = Some(value),
                "amount" => params.amount = Some(value),
                "userId" => params.user_id = Some(value),
                "productId" => params.product_id = Some(value),
                "orderName" => params.order_name = Some(value),
                "paymentMethod" => params.payment_method = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Names of required parameters that are absent or unusable.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.payment_key.is_none() {
            missing.push("paymentKey");
        }
        if self.order_id.is_none() {
            missing.push("orderId");
        }
        if self.parsed_amount().is_none() {
            missing.push("amount");
        }
        missing
    }

    fn parsed_amount(&self) -> Option<u64> {
        self.amount.as_deref()?.trim().parse().ok()
    }
}

/// What the success screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub order_id: String,
    pub order_name: String,
    pub amount: u64,
    pub payment_method: String,
    pub user_id: String,
    pub product_id: String,
}

impl PaymentReceipt {
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Order number", self.order_id.clone()),
            ("Product", self.order_name.clone()),
            ("Amount", format!("{} KRW", self.amount)),
            ("Payment method", self.payment_method.clone()),
            ("User ID", self.user_id.clone()),
            ("Product ID", self.product_id.clone()),
        ]
    }

    /// Where "Back" leads: the user's follows tab on the web app.
    pub fn return_link(&self, web_base_url: &str) -> Result<Url, LinkError> {
        web_link(web_base_url, &format!("/mypage/{}/follows", self.user_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    MissingParams(Vec<&'static str>),
    Confirmed(PaymentReceipt),
    Failed(PaymentReceipt),
}

/// Confirm and record a returned payment.
///
/// Nothing is sent when a required parameter is missing. Otherwise the
/// payment is confirmed and then saved regardless of the confirmation
/// result; a failed save is logged and does not change the outcome.
pub async fn finalize_payment(
    api: &PaymentApi,
    params: &PaymentParams,
    fallback_user: Option<&str>,
) -> PaymentOutcome {
    let (Some(payment_key), Some(order_id), Some(amount)) = (
        params.payment_key.as_ref(),
        params.order_id.as_deref(),
        params.parsed_amount(),
    ) else {
        let missing = params.missing();
        tracing::error!(?missing, "Payment return is missing required parameters");
        return PaymentOutcome::MissingParams(missing);
    };

    let confirmed = match api.confirm(payment_key, order_id, amount).await {
        Ok(confirmed) => confirmed,
        Err(e) => {
            tracing::error!(order_id, error = %e, "Payment confirmation request failed");
            false
        }
    };

    let receipt = PaymentReceipt {
        order_id: order_id.to_owned(),
        order_name: params
            .order_name
            .clone()
            .unwrap_or_else(|| DEFAULT_ORDER_NAME.to_owned()),
        amount,
        payment_method: params
            .payment_method
            .clone()
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned()),
        user_id: params
            .user_id
            .clone()
            .or_else(|| fallback_user.map(str::to_owned))
            .unwrap_or_default(),
        product_id: params.product_id.clone().unwrap_or_default(),
    };

    let record = PaymentRecord {
        order_id: receipt.order_id.clone(),
        user_id: receipt.user_id.clone(),
        product_id: receipt.product_id.clone(),
        order_name: receipt.order_name.clone(),
        amount,
        payment_method: receipt.payment_method.clone(),
        approved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    match api.save_payment_info(&record).await {
        Ok(()) => tracing::info!(order_id, "Payment info saved"),
        Err(e) => tracing::error!(order_id, error = %e, "Failed to save payment info"),
    }

    if confirmed {
        PaymentOutcome::Confirmed(receipt)
    } else {
        PaymentOutcome::Failed(receipt)
    }
}
