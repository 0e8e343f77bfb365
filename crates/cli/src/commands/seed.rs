//! Demo data for local development.
//!
//! Seeds three sellers, each with one store and one product, then one order
//! and one review per store. Running it again is a no-op once the demo user
//! exists.

use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::info;

use storekeep_core::forms::{OrderForm, ProductForm, ReviewForm, StoreForm};
use storekeep_core::{Email, UserId};
use storekeep_server::db::{ReviewRepository, StoreRepository, UserRepository};
use storekeep_server::models::{Product, Store};
use storekeep_server::services::auth::AuthService;
use storekeep_server::services::{orders, products};

use super::{CommandError, connect};

const SEED_PASSWORD: &str = "password123";

struct SeedSeller {
    email: &'static str,
    username: &'static str,
    store: SeedStore,
    product: SeedProduct,
}

struct SeedStore {
    name: &'static str,
    logo_url: &'static str,
    theme_color: &'static str,
    description: &'static str,
}

struct SeedProduct {
    title: &'static str,
    price: Decimal,
    description: &'static str,
    image_url: &'static str,
    tags: &'static str,
}

fn sellers() -> [SeedSeller; 3] {
    [
        SeedSeller {
            email: "demo@example.com",
            username: "demo",
            store: SeedStore {
                name: "Store Dash",
                logo_url: "https://images.pexels.com/photos/12384851/pexels-photo-12384851.jpeg",
                theme_color: "rgb(216, 217, 150)",
                description: "Cool shop!",
            },
            product: SeedProduct {
                title: "Summer Tee",
                price: Decimal::new(1500, 2),
                description: "Lightweight t-shirt perfect for summer days.",
                image_url: "https://images.pexels.com/photos/1926769/pexels-photo-1926769.jpeg",
                tags: "summer, shirt",
            },
        },
        SeedSeller {
            email: "bob@example.com",
            username: "bob",
            store: SeedStore {
                name: "Mug Life",
                logo_url: "https://placehold.co/200x200",
                theme_color: "#ff6600",
                description: "All mugs, all the time.",
            },
            product: SeedProduct {
                title: "Ceramic Coffee Mug",
                price: Decimal::new(1000, 2),
                description: "Classic white mug for your morning coffee.",
                image_url: "https://placehold.co/300x300",
                tags: "mug",
            },
        },
        SeedSeller {
            email: "charlie@example.com",
            username: "charlie",
            store: SeedStore {
                name: "Shirt Shack",
                logo_url: "https://placehold.co/200x200",
                theme_color: "#0099ff",
                description: "Trendy shirts for everyone.",
            },
            product: SeedProduct {
                title: "Graphic Tee",
                price: Decimal::new(2000, 2),
                description: "Trendy graphic t-shirt with a unique design.",
                image_url: "https://placehold.co/300x300",
                tags: "shirt",
            },
        },
    ]
}

/// Insert the demo data in one transaction.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let mut tx = pool.begin().await?;

    let marker = Email::parse("demo@example.com")?;
    if UserRepository::new(&mut tx).get_by_email(&marker).await?.is_some() {
        info!("Demo data already present, nothing to do");
        return Ok(());
    }

    let mut seeded: Vec<(UserId, Store, Product)> = Vec::new();
    for seller in sellers() {
        let (user_id, store, product) = seed_seller(&mut tx, &seller).await?;
        info!(store = %store.name, product = %product.title, "Seeded seller");
        seeded.push((user_id, store, product));
    }

    // Alice buys through the seller, Bob checks out as a guest.
    let buyers = [
        ("Alice", "alice@example.com", true),
        ("Bob", "bob@example.com", false),
        ("Charlie", "charlie@example.com", true),
    ];
    for ((name, email, by_seller), (user_id, store, product)) in buyers.into_iter().zip(&seeded) {
        let order = OrderForm {
            buyer_name: Some(name.to_owned()),
            buyer_email: Some(email.to_owned()),
            product_ids: Some(vec![product.id]),
            product_names: None,
        }
        .validate()?;
        let placed_by = by_seller.then_some(*user_id);
        orders::create_order(&mut tx, store, placed_by, order).await?;
    }

    // Each seller reviews another store's product.
    let comments = [
        (5, "Stylish and great quality fabric."),
        (5, "Love this tee! Super comfy and fits perfectly."),
        (4, "Great mug, keeps coffee warm. Just wish it was a bit bigger."),
    ];
    let pairs = seeded.iter().zip(seeded.iter().cycle().skip(2));
    for ((rating, comment), ((author, _, _), (_, _, product))) in comments.into_iter().zip(pairs) {
        let review = ReviewForm {
            rating: Some(rating),
            comment: Some(comment.to_owned()),
        }
        .validate()?;
        ReviewRepository::new(&mut tx)
            .create(*author, product.id, &review)
            .await?;
    }

    tx.commit().await?;
    info!("Seeding complete!");
    Ok(())
}

async fn seed_seller(
    conn: &mut PgConnection,
    seller: &SeedSeller,
) -> Result<(UserId, Store, Product), CommandError> {
    let user = AuthService::new(&mut *conn)
        .register(seller.email, seller.username, SEED_PASSWORD)
        .await?;

    let store = StoreForm {
        name: Some(seller.store.name.to_owned()),
        logo_url: Some(seller.store.logo_url.to_owned()),
        theme_color: Some(seller.store.theme_color.to_owned()),
        description: Some(seller.store.description.to_owned()),
    }
    .validate()?;
    let store = StoreRepository::new(&mut *conn).create(user.id, &store).await?;

    let product = ProductForm {
        title: Some(seller.product.title.to_owned()),
        price: Some(seller.product.price),
        description: Some(seller.product.description.to_owned()),
        image_url: Some(seller.product.image_url.to_owned()),
        in_stock: Some(true),
        tags: Some(seller.product.tags.to_owned()),
    }
    .validate()?;
    let product = products::create_product(conn, &store, product).await?;

    Ok((user.id, store, product))
}

/// Delete every row the application owns, sessions included.
pub async fn undo() -> Result<(), CommandError> {
    let pool = connect().await?;

    sqlx::query(
        r"
        TRUNCATE storekeep.review, storekeep.order_product, storekeep.order,
                 storekeep.product_tag, storekeep.tag, storekeep.product,
                 storekeep.store, storekeep.user, storekeep.session
        RESTART IDENTITY CASCADE
        ",
    )
    .execute(&pool)
    .await?;

    info!("All seeded data removed");
    Ok(())
}
