use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Offer {
    ean: i64,
    name: &'static str,
    price: f64,
    tag: &'static str,
}

const PRODUCTS: &[(i64, &str, f64)] = &[
    (5901234123457, "Kawa mielona 250g", 18.99),
    (5900512300108, "Herbata czarna 100 tor.", 12.49),
    (5900820000318, "Sok jabłkowy 1L", 5.79),
    (5907069000017, "Czekolada gorzka 100g", 6.29),
    (5900334000170, "Makaron spaghetti 500g", 4.99),
    (5902078000201, "Olej rzepakowy 1L", 9.89),
];

const TAGS: &[&str] = &["A", "B", "C", "PROMO"];

/// One offer per product per shop, priced up to 35% below list price.
fn shop_offers(rng: &mut SimpleRng, skip_every: usize) -> Vec<Offer> {
    PRODUCTS
        .iter()
        .enumerate()
        .filter(|(i, _)| skip_every == 0 || (i + 1) % skip_every != 0)
        .map(|(_, &(ean, name, list_price))| {
            let discount = rng.next_f64() * 0.35;
            let price = (list_price * (1.0 - discount) * 100.0).round() / 100.0;
            let tag = TAGS[(rng.next_u64() % TAGS.len() as u64) as usize];
            Offer { ean, name, price, tag }
        })
        .collect()
}

fn write_xlsx(path: &str, offers: &[Offer]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in ["EAN", "NAZWA", "CENA", "DYS"].iter().enumerate() {
        sheet.write_string(0, c as u16, *h)?;
    }
    for (i, o) in offers.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_number(r, 0, o.ean as f64)?;
        sheet.write_string(r, 1, o.name)?;
        sheet.write_number(r, 2, o.price)?;
        sheet.write_string(r, 3, o.tag)?;
    }
    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, offers: &[Offer]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("EAN", DataType::Int64, false),
        Field::new("NAZWA", DataType::Utf8, false),
        Field::new("CENA", DataType::Float64, false),
        Field::new("DYS", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(offers.iter().map(|o| o.ean))),
            Arc::new(StringArray::from_iter_values(offers.iter().map(|o| o.name))),
            Arc::new(Float64Array::from_iter_values(offers.iter().map(|o| o.price))),
            Arc::new(StringArray::from_iter_values(offers.iter().map(|o| o.tag))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let shop_a: Vec<Offer> = PRODUCTS
        .iter()
        .map(|&(ean, name, price)| Offer { ean, name, price, tag: "A" })
        .collect();
    let shop_b = shop_offers(&mut rng, 0);
    let shop_c = shop_offers(&mut rng, 3);

    write_xlsx("shop_a.xlsx", &shop_a)?;
    write_xlsx("shop_b.xlsx", &shop_b)?;
    write_parquet("shop_c.parquet", &shop_c)?;

    println!(
        "Wrote {} offers to shop_a.xlsx, {} to shop_b.xlsx, {} to shop_c.parquet",
        shop_a.len(),
        shop_b.len(),
        shop_c.len()
    );
    Ok(())
}
