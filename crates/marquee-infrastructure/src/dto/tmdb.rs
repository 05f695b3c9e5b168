//! TMDb v3 response bodies.

use marquee_core::catalog::{CastMember, Item, ItemDetail, Page, Trailer, parse_release_date};
use serde::Deserialize;

/// Number of cast members kept from a credits payload.
pub const MAX_CAST: usize = 10;

/// `GET /trending/movie/week` and `GET /search/movie`.
#[derive(Debug, Deserialize)]
pub struct MovieListDto {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<MovieDto>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl MovieListDto {
    /// Converts into a domain page. `requested` is used when the body omits
    /// its own page index.
    pub fn into_page(self, requested: u32) -> Page {
        let items = self.results.into_iter().map(Item::from).collect();
        Page::new(
            items,
            self.page.unwrap_or(requested),
            self.total_pages.unwrap_or(1),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl From<MovieDto> for Item {
    fn from(dto: MovieDto) -> Self {
        Item {
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            release_date: dto.release_date.as_deref().and_then(parse_release_date),
            rating: dto.vote_average,
            poster_path: dto.poster_path.filter(|path| !path.is_empty()),
            detail: None,
        }
    }
}

/// `GET /movie/{id}?append_to_response=credits,videos`.
#[derive(Debug, Deserialize)]
pub struct MovieDetailDto {
    #[serde(flatten)]
    pub movie: MovieDto,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreDto>,
    #[serde(default)]
    pub credits: Option<CreditsDto>,
    #[serde(default)]
    pub videos: Option<VideosDto>,
}

#[derive(Debug, Deserialize)]
pub struct GenreDto {
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct CreditsDto {
    #[serde(default)]
    pub cast: Vec<CastDto>,
}

#[derive(Debug, Deserialize)]
pub struct CastDto {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct VideosDto {
    #[serde(default)]
    pub results: Vec<VideoDto>,
}

#[derive(Debug, Deserialize)]
pub struct VideoDto {
    pub key: String,
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl VideosDto {
    /// First YouTube video typed as a trailer, else the first YouTube video.
    fn pick_trailer(self) -> Option<Trailer> {
        let youtube: Vec<VideoDto> = self
            .results
            .into_iter()
            .filter(|video| video.site == "YouTube" && !video.key.is_empty())
            .collect();
        let index = youtube
            .iter()
            .position(|video| video.kind.as_deref() == Some("Trailer"))
            .unwrap_or(0);
        youtube.into_iter().nth(index).map(|video| Trailer {
            site: video.site,
            key: video.key,
        })
    }
}

impl From<MovieDetailDto> for Item {
    fn from(dto: MovieDetailDto) -> Self {
        let mut cast = dto.credits.unwrap_or_default().cast;
        cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
        let cast = cast
            .into_iter()
            .take(MAX_CAST)
            .map(|member| CastMember {
                name: member.name,
                character: member.character.filter(|c| !c.is_empty()),
            })
            .collect();

        let detail = ItemDetail {
            overview: dto.overview.filter(|text| !text.trim().is_empty()),
            genres: dto.genres.into_iter().map(|genre| genre.name).collect(),
            cast,
            trailer: dto.videos.and_then(VideosDto::pick_trailer),
        };

        let mut item = Item::from(dto.movie);
        item.detail = Some(detail);
        item
    }
}
