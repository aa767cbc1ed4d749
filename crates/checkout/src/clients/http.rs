//! Reqwest-backed adapters for the basket, catalog and payment
//! services.
//!
//! These adapters own transport details only: URL construction, request
//! timeouts, HTTP error mapping, and JSON (de)serialization against the
//! services' camelCase wire DTOs. A 404 maps to `Ok(None)`; every other
//! failure maps to [`ClientError`].

use std::time::Duration;

use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use domain::{Basket, BasketLine, CatalogEntry, PaymentOutcome, PaymentStatus};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::clients::{BasketClient, CatalogClient, PaymentClient};
use crate::error::ClientError;

// -- Wire DTOs --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketLineDto {
    product_id: u64,
    quantity: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketDto {
    user_id: String,
    items: Vec<BasketLineDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDto {
    id: u64,
    name: String,
    price: f64,
    stock: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequestDto {
    order_id: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResultDto {
    order_id: String,
    status: String,
    message: String,
}

fn money_from_decimal(price: f64) -> Money {
    Money::from_cents((price * 100.0).round() as i64)
}

fn money_to_decimal(amount: Money) -> f64 {
    amount.cents() as f64 / 100.0
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::new("request timed out")
    } else {
        ClientError::new(err.to_string())
    }
}

fn status_error(status: StatusCode) -> ClientError {
    ClientError::new(format!("unexpected status {status}"))
}

/// Basket service adapter.
pub struct HttpBasketClient {
    client: Client,
    base: Url,
}

impl HttpBasketClient {
    /// Builds an adapter with an explicit request timeout.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base,
        })
    }

    fn url(&self, user_id: &UserId) -> Result<Url, ClientError> {
        self.base
            .join(&format!("api/basket/{}", user_id.as_str()))
            .map_err(|e| ClientError::new(e.to_string()))
    }
}

#[async_trait]
impl BasketClient for HttpBasketClient {
    async fn basket(&self, user_id: &UserId) -> Result<Option<Basket>, ClientError> {
        let response = self
            .client
            .get(self.url(user_id)?)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let dto: BasketDto = response.json().await.map_err(transport_error)?;
                let lines = dto
                    .items
                    .into_iter()
                    .map(|item| BasketLine::new(item.product_id, item.quantity))
                    .collect();
                Ok(Some(Basket::new(dto.user_id, lines)))
            }
            status => Err(status_error(status)),
        }
    }

    async fn upsert_line(&self, user_id: &UserId, line: BasketLine) -> Result<(), ClientError> {
        let dto = BasketLineDto {
            product_id: line.product_id.value(),
            quantity: line.quantity,
        };
        let response = self
            .client
            .post(self.url(user_id)?)
            .json(&dto)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(user_id)?)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(())
    }
}

/// Catalog service adapter.
pub struct HttpCatalogClient {
    client: Client,
    base: Url,
}

impl HttpCatalogClient {
    /// Builds an adapter with an explicit request timeout.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base,
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn product(&self, product_id: ProductId) -> Result<Option<CatalogEntry>, ClientError> {
        let url = self
            .base
            .join(&format!("api/catalog/products/{product_id}"))
            .map_err(|e| ClientError::new(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let dto: ProductDto = response.json().await.map_err(transport_error)?;
                Ok(Some(CatalogEntry::new(
                    dto.id,
                    dto.name,
                    money_from_decimal(dto.price),
                    dto.stock,
                )))
            }
            status => Err(status_error(status)),
        }
    }

    async fn all_products(&self) -> Result<Vec<CatalogEntry>, ClientError> {
        let url = self
            .base
            .join("api/catalog/products")
            .map_err(|e| ClientError::new(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let dtos: Vec<ProductDto> = response.json().await.map_err(transport_error)?;
        Ok(dtos
            .into_iter()
            .map(|dto| {
                CatalogEntry::new(dto.id, dto.name, money_from_decimal(dto.price), dto.stock)
            })
            .collect())
    }
}

/// Payment service adapter.
pub struct HttpPaymentClient {
    client: Client,
    base: Url,
}

impl HttpPaymentClient {
    /// Builds an adapter with an explicit request timeout.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base,
        })
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn authorize(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentOutcome, ClientError> {
        let url = self
            .base
            .join("api/payment")
            .map_err(|e| ClientError::new(e.to_string()))?;

        let request = PaymentRequestDto {
            order_id: order_id.to_string(),
            amount: money_to_decimal(amount),
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let dto: PaymentResultDto = response.json().await.map_err(transport_error)?;
        let status = match dto.status.as_str() {
            "Paid" => PaymentStatus::Paid,
            "Declined" => PaymentStatus::Declined,
            _ => PaymentStatus::Error,
        };
        // The authorizer echoes the order id; trust ours, keep theirs in
        // the message if they disagree.
        let message = if dto.order_id == order_id.to_string() {
            dto.message
        } else {
            format!("{} (authorizer echoed order {})", dto.message, dto.order_id)
        };

        Ok(PaymentOutcome::new(order_id, status, message))
    }
}
