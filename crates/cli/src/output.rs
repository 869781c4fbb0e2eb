//! CSV and metadata persistence. The files are plain RFC-4180 style CSV with
//! a header row; `metadata.json` records what was generated and with which
//! seed so a dataset directory is self-describing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use synthmart_core::{Dataset, GenerationConfig, GenerationReport};

use crate::commands::SizePreset;

pub fn write_dataset(
    dir: &Path,
    dataset: &Dataset,
    config: &GenerationConfig,
    report: &GenerationReport,
) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory `{}`", dir.display()))?;

    write_users(dir, dataset)?;
    write_products(dir, dataset)?;
    write_orders(dir, dataset)?;
    write_order_items(dir, dataset)?;
    write_reviews(dir, dataset)?;
    write_metadata(dir, dataset, config, report)?;

    tracing::info!(dir = %dir.display(), "dataset written");
    Ok(())
}

fn writer(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("creating `{}`", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_users(dir: &Path, dataset: &Dataset) -> Result<()> {
    let mut out = writer(dir, "users.csv")?;
    writeln!(out, "user_id,membership_tier,loyalty_points,signup_date")?;
    for customer in &dataset.customers {
        writeln!(
            out,
            "{},{},{},{}",
            customer.id,
            customer.membership_tier.as_str(),
            customer.loyalty_points,
            customer.signup_date
        )?;
    }
    Ok(())
}

fn write_products(dir: &Path, dataset: &Dataset) -> Result<()> {
    let mut out = writer(dir, "products.csv")?;
    writeln!(
        out,
        "product_id,name,brand,category,subcategory,price,weight_kg,stock_quantity,rating,is_featured,is_digital"
    )?;
    for product in &dataset.products {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            product.id,
            escape(&product.name),
            escape(&product.brand),
            product.category,
            escape(&product.subcategory),
            product.price,
            product.weight_kg,
            product.stock_quantity,
            product.rating,
            product.is_featured,
            product.is_digital
        )?;
    }
    Ok(())
}

fn write_orders(dir: &Path, dataset: &Dataset) -> Result<()> {
    let mut out = writer(dir, "orders.csv")?;
    writeln!(
        out,
        "order_id,user_id,order_date,status,total_amount,source,payment_method,shipping_method"
    )?;
    for order in &dataset.orders {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            order.id,
            order.customer_id,
            order.order_date,
            order.status.as_str(),
            order.total_amount,
            order.source.as_str(),
            order.payment_method.as_str(),
            order.shipping_method.as_str()
        )?;
    }
    Ok(())
}

fn write_order_items(dir: &Path, dataset: &Dataset) -> Result<()> {
    let mut out = writer(dir, "order_items.csv")?;
    writeln!(
        out,
        "order_id,product_id,quantity,unit_price,discount_rate,tax_amount,shipping_cost,total_price,is_cross_sell"
    )?;
    for item in &dataset.order_items {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            item.order_id,
            item.product_id,
            item.quantity,
            item.unit_price,
            item.discount_rate,
            item.tax_amount,
            item.shipping_cost,
            item.total_price,
            item.is_cross_sell
        )?;
    }
    Ok(())
}

fn write_reviews(dir: &Path, dataset: &Dataset) -> Result<()> {
    let mut out = writer(dir, "reviews.csv")?;
    writeln!(out, "review_id,user_id,product_id,rating,review_date,verified_purchase,order_id")?;
    for review in &dataset.reviews {
        let order_id =
            review.order_id.map(|id| id.0.to_string()).unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            review.id,
            review.customer_id,
            review.product_id,
            review.rating,
            review.review_date,
            review.verified_purchase,
            order_id
        )?;
    }
    Ok(())
}

fn write_metadata(
    dir: &Path,
    dataset: &Dataset,
    config: &GenerationConfig,
    report: &GenerationReport,
) -> Result<()> {
    let metadata = json!({
        "generator": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "seed": config.seed,
        "reference_date": config.reference_date.to_string(),
        "history_days": config.history_days,
        "size_bucket": SizePreset::for_order_count(config.orders).as_str(),
        "rows": {
            "users": dataset.customers.len(),
            "products": dataset.products.len(),
            "orders": dataset.orders.len(),
            "order_items": dataset.order_items.len(),
            "reviews": dataset.reviews.len(),
        },
        "abandoned_orders": report.abandoned_orders,
        "verified_reviews": report.verified_reviews,
        "unverified_reviews": report.unverified_reviews,
        "cross_sell_items": report.cross_sell_items,
    });

    let path = dir.join("metadata.json");
    let payload = serde_json::to_string_pretty(&metadata)
        .context("serializing dataset metadata")?;
    fs::write(&path, payload).with_context(|| format!("writing `{}`", path.display()))?;
    Ok(())
}

/// Quote a CSV field only when it needs it.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
