pub mod smugmug;

pub use smugmug::{
    parse_reply, AlbumExternal, AlbumsResponse, ApiReply, ApiStatus, ImageExternal,
    ImagesResponse, LoginResponse,
};
