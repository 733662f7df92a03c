use burn::prelude::*;
use burn::tensor::TensorData;

use crate::game::{Board, Player};

/// Number of planes produced by [`encode_planes`].
pub const PLANES: usize = 2;

/// Encode a board as a dense row vector of shape [1, height * width]
/// (player-relative).
///
/// Each cell is 1.0 for the acting player's chips, -1.0 for the opponent's and
/// 0.0 when empty, row-major from the top-left cell.
pub fn encode_dense<B: Backend>(board: &Board, player: Player, device: &B::Device) -> Tensor<B, 2> {
    let data = dense_features(board, player);
    let len = data.len();
    Tensor::<B, 1>::from_data(TensorData::from(data.as_slice()), device).reshape([1, len])
}

/// Encode a board as one-hot planes of shape [1, 2, height, width]
/// (player-relative).
///
/// Plane 0: acting player's chips (1.0 where placed)
/// Plane 1: opponent's chips (1.0 where placed)
pub fn encode_planes<B: Backend>(board: &Board, player: Player, device: &B::Device) -> Tensor<B, 4> {
    let data = plane_features(board, player);
    Tensor::<B, 1>::from_data(TensorData::from(data.as_slice()), device).reshape([
        1,
        PLANES,
        board.height(),
        board.width(),
    ])
}

/// Flat values behind [`encode_dense`]
pub fn dense_features(board: &Board, player: Player) -> Vec<f32> {
    let own = player.to_cell();
    let mut data = Vec::with_capacity(board.height() * board.width());
    for row in 0..board.height() {
        for col in 0..board.width() {
            let cell = board.get(row, col);
            data.push(if cell.is_empty() {
                0.0
            } else if cell == own {
                1.0
            } else {
                -1.0
            });
        }
    }
    data
}

/// Flat values behind [`encode_planes`]
pub fn plane_features(board: &Board, player: Player) -> Vec<f32> {
    let area = board.height() * board.width();
    let mut data = vec![0.0f32; PLANES * area];
    let own = player.to_cell();
    let opponent = player.other().to_cell();

    for row in 0..board.height() {
        for col in 0..board.width() {
            let cell = board.get(row, col);
            let idx = row * board.width() + col;
            if cell == own {
                data[idx] = 1.0; // plane 0
            } else if cell == opponent {
                data[area + idx] = 1.0; // plane 1
            }
        }
    }
    data
}
