//! Fixture data command handler

use crate::config::Config;
use crate::db::Store;

pub const FIXTURE_USER: &str = "Garfield Zhan";

pub const FIXTURE_MOVIES: [(&str, &str); 10] = [
    ("My Neighbor Totoro", "1988"),
    ("Dead Poets Society", "1989"),
    ("A Perfect World", "1993"),
    ("Leon", "1994"),
    ("Mahjong", "1996"),
    ("Swallowtail Butterfly", "1996"),
    ("King of Comedy", "1999"),
    ("Devils on the Doorstep", "1999"),
    ("WALL-E", "2008"),
    ("The Pork of Music", "2012"),
];

pub async fn cmd_forge(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    seed_fixtures(&store).await?;

    println!("Done");
    Ok(())
}

/// Insert the demo user and the ten demo movies.
pub async fn seed_fixtures(store: &Store) -> anyhow::Result<()> {
    store.insert_named_user(FIXTURE_USER).await?;

    for (title, year) in FIXTURE_MOVIES {
        store.add_movie(title, year).await?;
    }

    Ok(())
}
