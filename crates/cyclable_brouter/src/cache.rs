use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use cyclable_core::point::Point;
use fxhash::FxHasher64;

use crate::client::BRouterProfile;

pub const CACHE_FOLDER_ENV_VAR: &str = "CYCLABLE_CACHE_FOLDER";

/// Stores raw routing responses so a run can be replayed without hitting the
/// routing service again.
pub trait ResponseCache {
    fn cache(
        &self,
        origin: &Point,
        destination: &Point,
        profile: &BRouterProfile,
        body: &str,
    ) -> Result<(), anyhow::Error>;

    fn get_cached(
        &self,
        origin: &Point,
        destination: &Point,
        profile: &BRouterProfile,
    ) -> Result<Option<String>, anyhow::Error>;
}

#[derive(Default, Clone, Copy)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn cache(
        &self,
        _origin: &Point,
        _destination: &Point,
        _profile: &BRouterProfile,
        _body: &str,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }

    fn get_cached(
        &self,
        _origin: &Point,
        _destination: &Point,
        _profile: &BRouterProfile,
    ) -> Result<Option<String>, anyhow::Error> {
        Ok(None)
    }
}

fn hash_point<H>(point: &Point, hasher: &mut H)
where
    H: Hasher,
{
    hasher.write_u64(point.lon.to_bits());
    hasher.write_u64(point.lat.to_bits());
}

fn get_filename(origin: &Point, destination: &Point, profile: &BRouterProfile) -> String {
    let mut hasher = FxHasher64::default();

    hash_point(origin, &mut hasher);
    hash_point(destination, &mut hasher);
    profile.hash(&mut hasher);

    let hash = hasher.finish();
    format!("{:016x}.json", hash)
}

pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let folder = folder.into();

        if !folder.is_dir() {
            return Err(anyhow::anyhow!(format!(
                "Path {} is not a directory",
                folder.display()
            )));
        }

        Ok(Self { folder })
    }

    /// `None` when the cache folder variable is not set.
    pub fn from_env() -> Result<Option<Self>, anyhow::Error> {
        match std::env::var(CACHE_FOLDER_ENV_VAR) {
            Ok(folder) => Ok(Some(Self::new(folder)?)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl ResponseCache for FileCache {
    fn cache(
        &self,
        origin: &Point,
        destination: &Point,
        profile: &BRouterProfile,
        body: &str,
    ) -> Result<(), anyhow::Error> {
        let filename = get_filename(origin, destination, profile);

        let file = std::fs::File::create(self.folder.join(filename))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        writer.write_all(body.as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    fn get_cached(
        &self,
        origin: &Point,
        destination: &Point,
        profile: &BRouterProfile,
    ) -> Result<Option<String>, anyhow::Error> {
        let file_path = self
            .folder
            .join(get_filename(origin, destination, profile));

        if !file_path.is_file() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(file_path)?))
    }
}
